use gamecanvas_core::config::Settings;

const DOCUMENTATION: &str = r#"# Gamecanvas settings. You may edit this file, but be aware that formatting and comments will not
# be preserved. Missing keys take their defaults.

# Lengths are written as a number followed by a unit: px, in, pt or cm.
# Pinch scales are ratios of finger distance, in below 1 and out above 1.

# Examples:
# frame_rate = 30
# [canvas]
# width = 480
# height = 640
# [gestures]
# min_flick_distance = "2.5cm"

"#;

pub struct UserSettings {
    failed_to_load: bool,
    pub settings: Settings,
}
impl UserSettings {
    const FILENAME: &'static str = "settings.toml";
    /// Shared global settings, saved and loaded from user preferences.
    /// (Or defaulted, if unavailable for some reason)
    #[must_use]
    pub fn get() -> &'static Self {
        static GLOBAL_SETTINGS: std::sync::OnceLock<UserSettings> = std::sync::OnceLock::new();

        GLOBAL_SETTINGS.get_or_init(|| match Self::path() {
            None => Self::no_path(),
            Some(path) => Self::load_or_default(&path),
        })
    }
    /// Where the settings file lives, if there's a preferences dir at all.
    #[must_use]
    pub fn path() -> Option<std::path::PathBuf> {
        let mut dir = super::preferences_dir()?;
        dir.push(Self::FILENAME);
        Some(dir)
    }
    #[must_use]
    pub fn no_path() -> Self {
        log::warn!("Settings weren't available, defaulting.");
        Self {
            failed_to_load: true,
            settings: Settings::default(),
        }
    }
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        let settings = || -> anyhow::Result<Settings> {
            let string = std::fs::read_to_string(path)?;
            Ok(Settings::from_toml_str(&string)?)
        };

        match settings() {
            Ok(settings) => Self {
                failed_to_load: false,
                settings,
            },
            Err(e) => {
                log::debug!("couldn't read {}: {e:#}", path.display());
                Self::no_path()
            }
        }
    }
    /// Return true if loading user's settings failed. This can be useful for
    /// displaying a warning.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            super::preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        self.save_to(&preferences)
    }
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let string = DOCUMENTATION.to_owned() + &self.settings.to_toml_string()?;
        std::fs::write(path, string)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::UserSettings;
    use gamecanvas_core::config::Settings;

    fn scratch(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("gamecanvas-{}-{name}", std::process::id()));
        path
    }

    #[test]
    fn missing_file_defaults() {
        let loaded = UserSettings::load_or_default(&scratch("missing.toml"));
        assert!(loaded.did_fail_to_load());
        assert_eq!(loaded.settings, Settings::default());
    }
    #[test]
    fn saved_with_documentation() {
        let path = scratch("saved.toml");
        let mut user = UserSettings::no_path();
        user.settings.frame_rate = 24;
        user.save_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Gamecanvas settings."));
        let loaded = UserSettings::load_or_default(&path);
        let _ = std::fs::remove_file(&path);
        assert!(!loaded.did_fail_to_load());
        assert_eq!(loaded.settings.frame_rate, 24);
    }
    #[test]
    fn invalid_file_defaults() {
        let path = scratch("invalid.toml");
        std::fs::write(&path, "frame_rate = 0").unwrap();
        let loaded = UserSettings::load_or_default(&path);
        let _ = std::fs::remove_file(&path);
        assert!(loaded.did_fail_to_load());
    }
}
