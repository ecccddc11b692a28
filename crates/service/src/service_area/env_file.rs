//! Plain-text `KEY=VALUE` mirror of the service-area settings.
//!
//! Secondary configuration surface read by out-of-band startup tooling and
//! kept eventually consistent with the settings store by the writer. The
//! resolver's own read path never consults it.

use std::io;
use std::path::PathBuf;

use tokio::fs;

#[derive(Clone, Debug)]
pub struct EnvFileMirror {
    path: PathBuf,
}

impl EnvFileMirror {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Upsert the given pairs: an existing `KEY=` line (case-sensitive,
    /// anchored at line start) is replaced in place, a missing key is
    /// appended. Unrelated lines are preserved as-is and the file stays
    /// newline-terminated. A missing file is treated as empty.
    pub async fn sync(&self, entries: &[(&str, String)]) -> io::Result<()> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };

        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
        for (key, value) in entries {
            let prefix = format!("{key}=");
            let rendered = format!("{key}={value}");
            match lines.iter_mut().find(|line| line.starts_with(&prefix)) {
                Some(line) => *line = rendered,
                None => lines.push(rendered),
            }
        }

        let mut output = lines.join("\n");
        output.push('\n');
        fs::write(&self.path, output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("service_env_{}.env", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_is_created_with_entries() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let mirror = EnvFileMirror::new(&path);
        mirror
            .sync(&[("CENTRAL_LAT", "10".to_string()), ("CENTRAL_LNG", "20".to_string())])
            .await?;
        let content = tokio::fs::read_to_string(&path).await?;
        assert_eq!(content, "CENTRAL_LAT=10\nCENTRAL_LNG=20\n");
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn existing_line_is_replaced_not_duplicated() -> Result<(), anyhow::Error> {
        let path = temp_path();
        tokio::fs::write(&path, "CENTRAL_LAT=1.5\nSERVICE_RADIUS_KM=5\n").await?;
        let mirror = EnvFileMirror::new(&path);
        mirror.sync(&[("CENTRAL_LAT", "10".to_string())]).await?;
        let content = tokio::fs::read_to_string(&path).await?;
        assert_eq!(content, "CENTRAL_LAT=10\nSERVICE_RADIUS_KM=5\n");
        assert_eq!(content.matches("CENTRAL_LAT=").count(), 1);
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn unrelated_lines_survive_a_sync() -> Result<(), anyhow::Error> {
        let path = temp_path();
        tokio::fs::write(&path, "DATABASE_URL=postgres://localhost/tiffin\nSESSION_SECRET=s3cret\n")
            .await?;
        let mirror = EnvFileMirror::new(&path);
        mirror.sync(&[("SERVICE_RADIUS_KM", "25".to_string())]).await?;
        let content = tokio::fs::read_to_string(&path).await?;
        assert!(content.starts_with("DATABASE_URL=postgres://localhost/tiffin\nSESSION_SECRET=s3cret\n"));
        assert!(content.ends_with("SERVICE_RADIUS_KM=25\n"));
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn key_match_is_anchored_and_case_sensitive() -> Result<(), anyhow::Error> {
        let path = temp_path();
        tokio::fs::write(&path, "central_lat=1\nX_CENTRAL_LAT=2\n").await?;
        let mirror = EnvFileMirror::new(&path);
        mirror.sync(&[("CENTRAL_LAT", "10".to_string())]).await?;
        let content = tokio::fs::read_to_string(&path).await?;
        assert_eq!(content, "central_lat=1\nX_CENTRAL_LAT=2\nCENTRAL_LAT=10\n");
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
