use std::path::PathBuf;

const APP_DIR: &str = "issue-archiver";

/// Directory holding `config.yaml`: `$XDG_CONFIG_HOME/issue-archiver`,
/// or `~/.config/issue-archiver` when the variable is unset or empty.
pub fn app_config_dir() -> Option<PathBuf> {
    let base = match non_empty_env("XDG_CONFIG_HOME") {
        Some(xdg) => PathBuf::from(xdg),
        None => PathBuf::from(non_empty_env("HOME")?).join(".config"),
    };
    Some(base.join(APP_DIR))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
