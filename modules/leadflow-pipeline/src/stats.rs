/// Counts for one pipeline run, rendered verbatim in the summary message.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStatistics {
    pub engagers: u32,
    pub enriched: u32,
    pub pushed: u32,
    pub failed: u32,
}

impl std::fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "*Pipeline complete*")?;
        writeln!(f, "Engagers found:   {}", self.engagers)?;
        writeln!(f, "Verified emails:  {}", self.enriched)?;
        writeln!(f, "Pushed to campaign: {}", self.pushed)?;
        write!(f, "Failed to push:   {}", self.failed)
    }
}
