use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

pub struct AppPaths {
    pub config: PathBuf,
    pub documents: PathBuf,
}

impl AppPaths {
    pub fn from_project_dirs() -> Option<Self> {
        ProjectDirs::from("com", "pageblocks", "PageBlocks").map(|dirs| Self {
            config: dirs.config_dir().to_path_buf(),
            documents: dirs.data_dir().join("documents"),
        })
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config.join("settings.json")
    }

    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config)?;
        fs::create_dir_all(&self.documents)?;
        Ok(())
    }
}
