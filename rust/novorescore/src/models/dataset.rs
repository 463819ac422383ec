use serde::Serialize;

/// Which of the two parallel result sets a pipeline run is processing.
///
/// NOTE: target/decoy status is never tracked per identification, every row of
/// a run inherits the label of the dataset it came from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub enum DatasetLabel {
    Target,
    Decoy,
}

impl DatasetLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetLabel::Target => "target",
            DatasetLabel::Decoy => "decoy",
        }
    }

    /// Signed label used by the scoring tool.
    pub fn label(&self) -> i8 {
        match self {
            DatasetLabel::Target => 1,
            DatasetLabel::Decoy => -1,
        }
    }

    pub fn is_decoy(&self) -> bool {
        matches!(self, DatasetLabel::Decoy)
    }

    pub fn is_target(&self) -> bool {
        !self.is_decoy()
    }

    pub fn features_file_name(&self) -> String {
        format!("all_{}_features_df.csv", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(DatasetLabel::Target.label(), 1);
        assert_eq!(DatasetLabel::Decoy.label(), -1);
        assert!(DatasetLabel::Decoy.is_decoy());
        assert_eq!(
            DatasetLabel::Target.features_file_name(),
            "all_target_features_df.csv"
        );
    }
}
