use std::path::PathBuf;

const APP_DIR_NAME: &str = "propinas";

/// `$XDG_CONFIG_HOME/propinas`, falling back to `~/.config/propinas`.
pub fn config_dir() -> Result<PathBuf, String> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

/// `$XDG_DATA_HOME/propinas`, falling back to `~/.local/share/propinas`.
pub fn data_dir() -> Result<PathBuf, String> {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}

fn xdg_dir(var: &str, fallback: &[&str]) -> Result<PathBuf, String> {
    if let Some(base) = std::env::var_os(var).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(base).join(APP_DIR_NAME));
    }
    let home = std::env::var("HOME").map_err(|err| format!("resolve HOME: {}", err))?;
    let mut dir = PathBuf::from(home);
    dir.extend(fallback);
    Ok(dir.join(APP_DIR_NAME))
}
