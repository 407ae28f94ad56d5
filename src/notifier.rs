//! Terminal status lines for fill runs.

use jobfill_protocols::{FillStatus, ShellNotifier};
use tracing::{info, warn};

/// Renders fill status on stdout; configuration requests become a hint.
pub(crate) struct CliNotifier;

pub(crate) fn status_line(url: &str, status: &FillStatus) -> String {
    match status {
        FillStatus::Running => format!("Filling {url} ..."),
        FillStatus::Success {
            filled,
            resume,
            cover_letter,
            ai_filled,
        } => {
            let mut line = format!("Filled {filled} field(s) on {url}");
            if *ai_filled > 0 {
                line.push_str(&format!(" ({ai_filled} by AI)"));
            }
            if *resume {
                line.push_str(", resume attached");
            }
            if *cover_letter {
                line.push_str(", cover letter attached");
            }
            line
        }
        FillStatus::Error { reason } => format!("Fill failed on {url}: {reason}"),
    }
}

impl ShellNotifier for CliNotifier {
    fn status(&self, url: &str, status: FillStatus) {
        match &status {
            FillStatus::Error { .. } => warn!(url, "{:?}", status),
            _ => info!(url, "{:?}", status),
        }
        println!("{}", status_line(url, &status));
    }

    fn open_configuration(&self) {
        println!(
            "No applicant profile configured. Set [applicant].profile in the config file \
             and run `jobfill check`."
        );
    }
}
