//! Gemfile edits.
//!
//! Gems are appended to the end of the Gemfile, one line each; a group is
//! appended as a single `group ... do ... end` block.

use std::fmt;

use railsmith_core::domain::MutationOp;

const GEMFILE: &str = "Gemfile";

/// One `gem` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gem {
    name: &'static str,
    version: Option<&'static str>,
    require: bool,
}

impl Gem {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            version: None,
            require: true,
        }
    }

    pub fn version(mut self, requirement: &'static str) -> Self {
        self.version = Some(requirement);
        self
    }

    /// Adds `require: false`.
    pub fn no_require(mut self) -> Self {
        self.require = false;
        self
    }
}

impl fmt::Display for Gem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gem \"{}\"", self.name)?;
        if let Some(v) = self.version {
            write!(f, ", \"{v}\"")?;
        }
        if !self.require {
            f.write_str(", require: false")?;
        }
        Ok(())
    }
}

pub fn gem(gem: Gem) -> MutationOp {
    MutationOp::append(GEMFILE, format!("{gem}\n"))
}

pub fn gem_group(group: &str, gems: &[Gem]) -> MutationOp {
    let mut block = format!("\ngroup :{group} do\n");
    for g in gems {
        block.push_str(&format!("  {g}\n"));
    }
    block.push_str("end\n");
    MutationOp::append(GEMFILE, block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gem_lines() {
        assert_eq!(Gem::new("lograge").to_string(), "gem \"lograge\"");
        assert_eq!(
            Gem::new("litestack").version("~> 0.4.2").to_string(),
            "gem \"litestack\", \"~> 0.4.2\""
        );
        assert_eq!(
            Gem::new("aws-sdk-s3").no_require().to_string(),
            "gem \"aws-sdk-s3\", require: false"
        );
    }

    #[test]
    fn group_block_is_appended() {
        let op = gem_group("development", &[Gem::new("brakeman"), Gem::new("standard")]);
        let out = op.apply(Some("source \"https://rubygems.org\"\n")).unwrap();
        assert_eq!(
            out,
            "source \"https://rubygems.org\"\n\ngroup :development do\n  gem \"brakeman\"\n  gem \"standard\"\nend\n"
        );
    }
}
