//! File contents written by the recipe.
//!
//! Anything that depends on the configuration is a function; the rest are
//! constants.

use railsmith_core::domain::Configuration;

pub fn procfile_dev(config: &Configuration) -> String {
    let mut out = format!("web: bin/rails server -p {}\n", config.port());
    if config.uses_tailwind() {
        out.push_str("css: bin/rails tailwindcss:watch\n");
    }
    out
}

pub const OVERMIND_ENV: &str = "OVERMIND_PROCFILE=Procfile.dev\n";

pub const GITIGNORE_ENTRY: &str = "\n/config/database.yml\n";

pub fn standard_yml(config: &Configuration) -> String {
    format!(
        r"fix: false              # default: false
parallel: true          # default: false
format: progress        # default: Standard::Formatter
ruby_version: {}     # default: RUBY_VERSION
default_ignores: false  # default: true
ignore:                 # default: []
  - 'node_modules/**/*'
  - 'db/migrate/**/*'
  - 'db/schema.rb'
  - 'bin/**/*'
  - 'Gemfile'
  - 'config/environments/**/*'
  - 'config/application.rb'
  - 'config/boot.rb'
  - 'config/puma.rb'
",
        config.ruby_version()
    )
}

pub const SOLARGRAPH_YML: &str = r#"include:
  - "**/*.rb"
exclude:
  - spec/**/*
  - test/**/*
  - vendor/**/*
  - ".bundle/**/*"
require:
  - actioncable
  - actionmailer
  - actionpack
  - actionview
  - activejob
  - activemodel
  - activerecord
  - activestorage
  - activesupport
plugins:
  - solargraph-rails
max_files: 5000
"#;

pub const RUBOCOP_YML: &str = "require: standard

inherit_gem:
  standard: config/base.yml
";

pub const BIN_SETUP: &str = r#"#!/usr/bin/env ruby
require "fileutils"
# path to your application root.
APP_ROOT = File.expand_path('..', __dir__)
def system!(*args)
  system(*args) || abort("\n== Command #{args} failed ==")
end
FileUtils.chdir APP_ROOT do
  # This script is a way to set up or update your development environment automatically.
  # This script is idempotent, so that you can run it at any time and get an expectable outcome.
  # Add necessary setup steps to this file.
  puts '== Installing Ruby dependencies =='
  system! 'gem install bundler --conservative'
  system('bundle check') || system!('bundle install')
  puts "\n== Copying sample files =="
  unless File.exist?('config/database.yml')
    FileUtils.cp 'config/database.yml.example', 'config/database.yml'
  end
  puts "\n== Preparing database =="
  system! 'bin/rails db:prepare'
  puts "\n== Removing old logs and tempfiles =="
  system! 'bin/rails log:clear tmp:clear'
  puts "\n== Restarting application server =="
  if File.exist?('.overmind.sock')
    system! 'overmind restart'
  end
end
"#;

pub const BIN_CI: &str = r#"#!/usr/bin/env bash
# bin/ci
set -e
echo "Running Unit Tests"
bin/rails test
echo "Running System Tests"
bin/rails test:system
echo "Linting Ruby code with StandardRb."
echo "It will not autofix issues."
bundle exec standardrb
echo "Analyzing code for security vulnerabilities."
echo "Output will be in tmp/brakeman.html, which"
echo "can be opened in your browser."
bundle exec brakeman -q -o tmp/brakeman.html
echo "Analyzing Ruby gems for"
echo "security vulnerabilities"
bundle exec bundle audit check --update
echo "Analyzing Node modules"
echo "for security vulnerabilities"
"#;

pub const GENERATORS_INITIALIZER: &str = "Rails.application.config.generators do |g|
  g.stylesheets false
end
";

pub const LOGRAGE_INITIALIZER: &str = r#"Rails.application.configure do
  config.lograge.enabled = !Rails.env.development? || ENV["LOGRAGE_IN_DEVELOPMENT"] == "true"
end
"#;

pub const RACK_ATTACK_INITIALIZER: &str = r#"Rack::Attack.enabled = !Rails.env.test?

# Throttle requests from a single IP to 5 requests per second
Rack::Attack.throttle('req/ip', limit: 5, period: 1.second) do |req|
  req.ip
end

# Rack::Attack.throttle('limit logins per email', limit: 5, period: 1.minute) do |req|
#   if req.path == '/login' && req.post?
#     req.params['email']
#   end
# end

# Rack::Attack.blocklist("block script kidz") do |req|
#   CGI.unescape(req.query_string) =~ %r{/etc/passwd} ||
#   req.path.include?("/etc/passwd") ||
#   req.path.include?("wp-admin") ||
#   req.path.include?("wp-login")
# end
"#;

pub fn development_settings(config: &Configuration) -> String {
    format!(
        r#"# Letter opener configuration
config.default_url_options = {{ host: "localhost:{}" }}
config.action_mailer.delivery_method = :letter_opener
config.action_mailer.perform_deliveries = true
"#,
        config.port()
    )
}

pub const PRODUCTION_SETTINGS: &str = r#"# Update this value with real domain name
config.default_url_options = { host: ENV.fetch("APPLICATION_HOST") }
"#;

// ── config/application.rb ────────────────────────────────────────────────────

pub const AFTER_TIME_ZONE: &str = r#"    # config.time_zone = "Central Time (US & Canada)""#;
pub const LOCALES: &str = "\n    # Configure your locales.\n    # config.i18n.available_locales = :es\n    # config.i18n.default_locale = :es\n";

pub const AFTER_EAGER_LOAD: &str = r#"    # config.eager_load_paths << Rails.root.join("extras")"#;
pub const STORAGE_PROXY: &str = "\n    # Configure a proxy for Active Storage if need it. Also, don't forget to set public: true in config/storage.yml file.\n    # config.active_storage.resolve_model_to_route = :rails_storage_proxy\n";

pub const APPLICATION_SETTINGS: &str = r#"    config.action_view.field_error_proc = proc { |html_tag, instance| html_tag.html_safe }

    unless Rails.env.test?
      config.active_job.queue_adapter = :solid_queue
    end
"#;

pub const APPLICATION_CLASS: &str = "  class Application < Rails::Application";
pub const RACK_ATTACK_MIDDLEWARE: &str = "\n    config.middleware.use Rack::Attack";

pub const QUEUE_ADAPTER: &str = "config.active_job.queue_adapter = :solid_queue";
pub const QUEUE_CONNECTS_TO: &str =
    "\n      config.solid_queue.connects_to = { database: { writing: :queue, reading: :queue } }";

// ── after bundle ─────────────────────────────────────────────────────────────

pub const SOLID_QUEUE_PROCESS: &str = "solid_queue: bin/rails solid_queue:start";

pub const JOBS_ROUTE: &str = "  mount MissionControl::Jobs::Engine, at: \"/jobs\"\n";

pub const ACTIONTEXT_PIN: &str = r#"pin "@rails/actiontext", to: "actiontext.esm.js""#;
pub const ACTIVESTORAGE_PIN: &str = "pin \"@rails/activestorage\", to: \"activestorage.esm.js\"\n";

pub const ACTIONTEXT_IMPORT: &str = r#"import "@rails/actiontext""#;
pub const ACTIVESTORAGE_IMPORT: &str =
    "import * as ActiveStorage from \"@rails/activestorage\"\nActiveStorage.start()\n";

pub const HEAD_BOTTOM: &str =
    "\n  <%= turbo_refreshes_with method: :morph, scroll: :preserve %>\n    <%= yield :head %>\n";
pub const HEAD_TOP: &str = "\n    <%= display_meta_tags site: \"My Rails application\" %>";

pub const ROOT_ROUTE_COMMENT: &str = r#"# root "posts#index""#;
pub const ROOT_ROUTE: &str = r#"root "home#index""#;

// ── tailwind ─────────────────────────────────────────────────────────────────

pub const FONT_FAMILY: &str = "      fontFamily: {";

pub const TAILWIND_PALETTE: &str = r"textColor: {
  skin: {
    inverted: 'rgb(var(--color-inverted) / <alpha-value>)',
    accented: 'rgb(var(--color-accented) / <alpha-value>)',
    'accented-hover': 'rgb(var(--color-accented-hover) / <alpha-value>)',
    base: 'rgb(var(--color-base) / <alpha-value>)',
    muted: 'rgb(var(--color-muted) / <alpha-value>)',
    dimmed: 'rgb(var(--color-dimmed) / <alpha-value>)',
    error: 'rgb(var(--color-error) / <alpha-value>)',
    alternate: 'rgb(var(--color-alternate) / <alpha-value>)',
  }
},
backgroundColor: {
  skin: {
    'button-accented': 'rgb(var(--color-accented) / <alpha-value>)',
    'button-accented-hover': 'rgb(var(--color-accented-hover) / <alpha-value>)',
    'button-inverted': 'rgb(var(--color-inverted) / <alpha-value>)',
    'button-inverted-hover': 'rgb(var(--color-inverted-hover) / <alpha-value>)',
    'button-caution': 'rgb(var(--color-error) / <alpha-value>)',
    'button-caution-hover': 'rgb(var(--color-error-hover) / <alpha-value>)',
    muted: 'rgb(var(--color-muted) / <alpha-value>)',
    dimmed: 'rgb(var(--color-dimmed) / <alpha-value>)',
    accented: 'rgb(var(--color-accented) / <alpha-value>)',
    'accented-hover': 'rgb(var(--color-accented-hover) / <alpha-value>)',
    alternate: 'rgb(var(--color-alternate) / <alpha-value>)',
  }
},
ringColor: {
  skin: {
    accented: 'rgb(var(--color-border-accented) / <alpha-value>)',
    inverted: 'rgb(var(--color-inverted) / <alpha-value>)',
    error: 'rgb(var(--color-error) / <alpha-value>)',
  }
},
borderColor: {
  skin: {
    base: 'rgb(var(--color-border-base) / <alpha-value>)',
    error: 'rgb(var(--color-error) / <alpha-value>)',
    accented: 'rgb(var(--color-border-accented) / <alpha-value>)',
  }
},
textDecorationColor: {
  skin: {
    accented: 'rgb(var(--color-border-accented) / <alpha-value>)'
  }
},
";

pub const CONFIG_CSS: &str = r":root {
  --color-base: 15 23 42;
  --color-accented: 244 63 94;
  --color-accented-hover: 190 18 60;
  --color-inverted: 255 255 255;
  --color-muted: 55 65 81;
  --color-dimmed: 75 85 99;
  --color-error: 220 38 38;
  --color-error-hover: 185 28 28;
  --color-alternate: 249 115 22;
  --color-alternate-1: 230 242 251;
  --color-alternate-2: 2 63 109;

  --color-border-base: 209 213 219;
  --color-border-accented: 244 63 94;
}

body {
  @apply font-sans antialiased;
}
";

pub const TAILWIND_BASE: &str = "@tailwind base;";
pub const CONFIG_CSS_IMPORT: &str = "\n@import \"config.css\";";
pub const ACTIONTEXT_CSS_IMPORT: &str = "@import 'actiontext.css';";
pub const TRIX_CSS_IMPORT: &str = "@import \"trix.css\";\n";

/// (pattern, replacement) pairs applied to the Tailwind entry stylesheet.
pub const TAILWIND_DIRECTIVES: [(&str, &str); 3] = [
    ("@tailwind base;", "@import \"tailwindcss/base\";"),
    ("@tailwind components;", "@import \"tailwindcss/components\";"),
    ("@tailwind utilities;", "@import \"tailwindcss/utilities\";"),
];
