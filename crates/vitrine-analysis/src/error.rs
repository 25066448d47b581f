#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("unknown column '{name}'")]
    UnknownColumn { name: String },
    #[display("group labels must differ, got '{label}' twice")]
    SameGroupLabels { label: String },
}
