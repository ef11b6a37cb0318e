//! Everything that talks to, or interprets, the external taskline tool.

pub mod parse;
pub mod runner;

pub use parse::{Listing, parse_listing};
pub use runner::{EntryKind, Submission, Taskline, TasklineCommand};

/// Fetch and parse the listing, degrading to a placeholder on failure.
pub fn load_listing(taskline: &dyn Taskline) -> Listing {
    match taskline.fetch_listing() {
        Ok(raw) => parse_listing(&raw),
        Err(err) => {
            tracing::warn!("Failed to fetch listing: {err}");
            Listing::unavailable()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::taskline::runner::TasklineError;

    struct Scripted(Option<&'static str>);

    impl Taskline for Scripted {
        fn fetch_listing(&self) -> Result<String, TasklineError> {
            self.0.map(str::to_string).ok_or(TasklineError::Exit {
                program: "taskline".to_string(),
                code: None,
            })
        }

        fn submit(&self, _: &Submission) -> Result<(), TasklineError> {
            Ok(())
        }
    }

    #[test]
    fn fetch_failure_degrades_to_unavailable() {
        assert_eq!(load_listing(&Scripted(None)), Listing::unavailable());
    }

    #[test]
    fn fetched_output_is_parsed() {
        let listing = load_listing(&Scripted(Some("\n  My Board\n    1. x\n\n  done\n\n")));
        assert_eq!(listing, parse_listing("\n  My Board\n    1. x\n\n  done\n\n"));
        assert!(listing.has_summary());
    }
}
