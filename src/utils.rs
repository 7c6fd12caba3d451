use crate::ClimaError;
use log::info;
use std::io;
use std::path::Path;

pub(crate) async fn ensure_dir_exists(path: &Path) -> Result<(), ClimaError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(ClimaError::ExportDirCreation(
                    path.to_path_buf(),
                    io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        "path exists but is not a directory",
                    ),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating export directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| ClimaError::ExportDirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(ClimaError::ExportDirCreation(path.to_path_buf(), e)),
    }
}
