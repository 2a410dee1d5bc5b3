use crate::areas::refs::{HEAD_REF_NAME, RefValue};
use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;

pub const DEFAULT_BRANCH: &str = "master";

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .ugit/objects directory")?;

        fs::create_dir_all(self.refs().refs_path())
            .context("Failed to create .ugit/refs directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .ugit/refs/heads directory")?;

        self.refs()
            .update_ref(
                HEAD_REF_NAME,
                RefValue::Symbolic(format!("refs/heads/{DEFAULT_BRANCH}")),
                false,
            )
            .context("Failed to create initial HEAD reference")?;

        writeln!(
            self.writer(),
            "Initialized empty ugit repository in {}",
            self.path().display()
        )?;

        Ok(())
    }
}
