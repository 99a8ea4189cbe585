//! Scripted input provider
//!
//! Fixed answers for non-interactive runs and tests.

use crate::domain::result::Result;
use crate::ports::InputProvider;

/// `InputProvider` that returns preset values
#[derive(Clone, Default)]
pub struct ScriptedInput {
    pub mnemonic: String,
    pub amount: String,
    pub recipients: Vec<String>,
}

impl ScriptedInput {
    pub fn new(
        mnemonic: impl Into<String>,
        amount: impl Into<String>,
        recipients: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            amount: amount.into(),
            recipients: recipients.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Debug for ScriptedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedInput")
            .field("amount", &self.amount)
            .field("recipients", &self.recipients.len())
            .finish_non_exhaustive()
    }
}

impl InputProvider for ScriptedInput {
    fn mnemonic(&self) -> Result<String> {
        Ok(self.mnemonic.clone())
    }

    fn amount(&self) -> Result<String> {
        Ok(self.amount.clone())
    }

    fn recipients(&self) -> Result<Vec<String>> {
        Ok(self.recipients.clone())
    }
}
