// Data sources the report engine reads from.
//
// Only sources touch stored data; the pipeline receives fully
// materialized rows and never paginates.
use crate::error::ReportResult;
use crate::scope::ReportScope;
use crate::types::{FactRow, Member, SubmissionRecord};

pub trait RowSource {
    /// All fact rows within `scope`, in no particular order.
    fn fetch_rows(&self, scope: &ReportScope) -> ReportResult<Vec<FactRow>>;
}

pub trait MembershipSource {
    fn roster(&self) -> ReportResult<Vec<Member>>;

    /// One record per submission (not de-duplicated).
    fn submissions(&self) -> ReportResult<Vec<SubmissionRecord>>;
}

/// Everything loaded from the export files, held in memory.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub facts: Vec<FactRow>,
    pub members: Vec<Member>,
    pub submissions: Vec<SubmissionRecord>,
}

impl RowSource for Dataset {
    fn fetch_rows(&self, scope: &ReportScope) -> ReportResult<Vec<FactRow>> {
        let rows: Vec<FactRow> = self
            .facts
            .iter()
            .filter(|r| scope.admits(r))
            .cloned()
            .collect();
        log::debug!(
            "source: {} of {} fact rows in scope",
            rows.len(),
            self.facts.len()
        );
        Ok(rows)
    }
}

impl MembershipSource for Dataset {
    fn roster(&self) -> ReportResult<Vec<Member>> {
        Ok(self.members.clone())
    }

    fn submissions(&self) -> ReportResult<Vec<SubmissionRecord>> {
        Ok(self.submissions.clone())
    }
}
