use tml_hir::HirModule;

use crate::error::HirReadError;

/// Placeholder reader for text dumps. Always yields an empty module.
pub struct HirTextReader<'a> {
    text: &'a str,
    error: Option<HirReadError>,
}

impl<'a> HirTextReader<'a> {
    pub fn new(text: &'a str) -> Self {
        HirTextReader { text, error: None }
    }

    pub fn read_module(&mut self) -> HirModule {
        tracing::debug!(bytes = self.text.len(), "text HIR input ignored");
        self.error = Some(HirReadError::TextUnsupported);
        HirModule::default()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&HirReadError> {
        self.error.as_ref()
    }
}
