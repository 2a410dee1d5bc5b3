use crate::areas::repository::Repository;
use crate::artifacts::remote;

impl Repository {
    /// Push a local branch to a filesystem remote, fast-forward only
    pub fn push(&self, remote_path: &str, branch: &str) -> anyhow::Result<()> {
        let remote = remote::open(remote_path)?;
        let refname = format!("refs/heads/{branch}");

        let pushed = remote::push(self, &remote, &refname)?;
        writeln!(
            self.writer(),
            "Pushed {refname} ({}) to {remote_path}",
            pushed.to_short_oid()
        )?;

        Ok(())
    }
}
