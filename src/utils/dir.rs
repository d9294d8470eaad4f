use std::{
    env, io,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};

/// Directory holding the configuration record and logs. `$XDG_CONFIG_HOME/onelist` or
/// `$HOME/.config/onelist` on unix, `%APPDATA%\onelist` on Windows.
pub fn create_application_default_path() -> Result<PathBuf> {
    let path = {
        #[cfg(windows)]
        {
            let mut path = env::var("APPDATA")
                .map(PathBuf::from)
                .map_err(|_| anyhow!("APPDATA should be present on Windows"))?;
            path.push("onelist");
            path
        }
        #[cfg(not(windows))]
        {
            let mut path = env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    env::var("HOME").map(|home| {
                        let mut path = PathBuf::from(home);
                        path.push(".config");
                        path
                    })
                })
                .map_err(|_| anyhow!("Couldn't find neither XDG_CONFIG_HOME nor HOME"))?;
            path.push("onelist");
            path
        }
    };

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

/// Expands a leading `~/` to the home directory. Other paths are returned untouched.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    let var = "USERPROFILE";
    #[cfg(not(windows))]
    let var = "HOME";
    env::var_os(var).map(PathBuf::from)
}
