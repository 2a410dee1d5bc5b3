use crate::areas::repository::Repository;
use crate::artifacts::remote;

impl Repository {
    /// Mirror the branches of a filesystem remote into `refs/remote/`
    pub fn fetch(&self, remote_path: &str) -> anyhow::Result<()> {
        let remote = remote::open(remote_path)?;

        let fetched = remote::fetch(self, &remote)?;
        for fetched_ref in &fetched {
            writeln!(
                self.writer(),
                "{} -> {}",
                fetched_ref.oid.to_short_oid(),
                fetched_ref.refname
            )?;
        }

        if fetched.is_empty() {
            writeln!(self.writer(), "nothing to fetch")?;
        }

        Ok(())
    }
}
