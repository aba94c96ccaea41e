//! Upload outcome surfaced to the user.
//!
//! The upstream does all spreadsheet parsing and validation; this side only
//! relays the verdict. A rejected upload is reported once with the missing
//! columns joined verbatim, never retried automatically.

use crate::upstream::UploadOutcome;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase", tag = "status")]
#[ts(export)]
pub enum UploadReport {
    Accepted,
    #[serde(rename_all = "camelCase")]
    Rejected {
        missing_columns: Vec<String>,
        /// Comma-joined column list for direct display.
        message: String,
    },
}

impl From<UploadOutcome> for UploadReport {
    fn from(outcome: UploadOutcome) -> Self {
        if outcome.success {
            return UploadReport::Accepted;
        }
        let missing_columns = outcome.missing_columns.unwrap_or_default();
        let message = missing_columns.join(", ");
        UploadReport::Rejected {
            missing_columns,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_joins_columns_verbatim() {
        let outcome = UploadOutcome {
            success: false,
            missing_columns: Some(vec!["Start Time".into(), "Room".into()]),
        };
        match UploadReport::from(outcome) {
            UploadReport::Rejected {
                missing_columns,
                message,
            } => {
                assert_eq!(missing_columns, ["Start Time", "Room"]);
                assert_eq!(message, "Start Time, Room");
            }
            UploadReport::Accepted => panic!("expected rejection"),
        }
    }

    #[test]
    fn success_is_accepted() {
        let outcome = UploadOutcome {
            success: true,
            missing_columns: None,
        };
        assert_eq!(UploadReport::from(outcome), UploadReport::Accepted);
    }
}
