//! Configuration system with embedded defaults and XDG-compliant paths.
//!
//! Boot sequence:
//! 1. Parse the embedded `default_config.toml` (compile-time guarantee it exists).
//! 2. Resolve `~/.config/pawpoll/config.toml` via the `directories` crate.
//! 3. If the user file doesn't exist, create the directory tree and write the default.
//! 4. Parse the user file (falling back to embedded defaults on any error).
//! 5. Store the resolved `Config` in a `OnceLock` for zero-cost global access.
//!
//! Every other module calls `config::get()` to obtain a `&'static Config`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use crossterm::event::KeyCode;
use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{info, warn};

/// Embedded default configuration, baked into the binary at compile time.
const DEFAULT_CONFIG_STR: &str = include_str!("../default_config.toml");

/// Application-wide config singleton.
static CONFIG: OnceLock<Config> = OnceLock::new();

// ─── Public API ─────────────────────────────────────────────────────────────

/// Initialise the configuration system. Must be called exactly once at
/// startup, **after** tracing and before the UI or controller start.
pub fn init() -> Result<()> {
    let config = load()?;
    CONFIG
        .set(config)
        .map_err(|_| eyre!("Config already initialised"))?;
    Ok(())
}

/// Return a static reference to the loaded configuration. If `init()` was
/// never called (unit tests), the embedded defaults are used.
pub fn get() -> &'static Config {
    CONFIG.get_or_init(|| {
        let raw = toml::from_str::<RawConfig>(DEFAULT_CONFIG_STR).unwrap_or_default();
        Config::from(raw)
    })
}

// ─── Loading logic ──────────────────────────────────────────────────────────

fn load() -> Result<Config> {
    // 1. Parse compiled-in defaults, the infallible baseline.
    let defaults: RawConfig = toml::from_str(DEFAULT_CONFIG_STR)
        .wrap_err("BUG: failed to parse embedded default_config.toml")?;

    // 2. Resolve user config path.
    let user_path = config_path();
    info!("Config path: {}", user_path.display());

    // 3. Bootstrap on first run.
    ensure_config_file(&user_path)?;

    // 4. Parse user file; fall back to embedded defaults on *any* error.
    let raw = match fs::read_to_string(&user_path) {
        Ok(contents) => match toml::from_str::<RawConfig>(&contents) {
            Ok(parsed) => {
                info!("Loaded user config from {}", user_path.display());
                parsed
            }
            Err(e) => {
                warn!(
                    "Parse error in {}: {e}, falling back to defaults",
                    user_path.display()
                );
                defaults
            }
        },
        Err(e) => {
            warn!(
                "Cannot read {}: {e}, falling back to defaults",
                user_path.display()
            );
            defaults
        }
    };

    Ok(Config::from(raw))
}

/// Resolve the XDG-compliant config file path.
fn config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "pawpoll")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".config/pawpoll/config.toml"))
}

/// Create the config directory tree and write the default file if absent.
fn ensure_config_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create config dir: {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_STR)
        .wrap_err_with(|| format!("Failed to write default config to {}", path.display()))?;
    info!("Created default config at {}", path.display());
    Ok(())
}

// ─── Hex colour helper ─────────────────────────────────────────────────────

/// Parse a `#RRGGBB` hex string into an RGB `Color`.
fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Newtype that serialises as `"#RRGGBB"` and deserialises from the same.
#[derive(Debug, Clone, Copy)]
pub struct HexColor(pub Color);

impl Default for HexColor {
    fn default() -> Self {
        HexColor(Color::Reset)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Color::Rgb(r, g, b) => s.serialize_str(&format!("#{r:02X}{g:02X}{b:02X}")),
            _ => s.serialize_str("#FFFFFF"),
        }
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(HexColor(parse_hex_color(&s).unwrap_or(Color::Reset)))
    }
}

// ─── Raw TOML structures (serde targets) ────────────────────────────────────
//
// Each struct carries `#[serde(default)]` so that missing keys or entire
// sections gracefully fill in from the compiled defaults.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawConfig {
    general: RawGeneral,
    api: RawApi,
    polling: RawPolling,
    notifications: RawNotifications,
    theme: RawTheme,
    keybindings: RawKeybindings,
}

// ── General ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawGeneral {
    tick_rate_ms: u64,
    results_panel_percent: u16,
}

impl Default for RawGeneral {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            results_panel_percent: 55,
        }
    }
}

// ── API ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawApi {
    base_url: String,
    health_path: String,
    request_timeout_secs: u64,
}

impl Default for RawApi {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".into(),
            health_path: "/".into(),
            request_timeout_secs: 10,
        }
    }
}

// ── Polling ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawPolling {
    interval_ms: u64,
    auto_refresh: bool,
    warn_on_network_error: bool,
}

impl Default for RawPolling {
    fn default() -> Self {
        Self {
            interval_ms: 3000,
            auto_refresh: true,
            warn_on_network_error: false,
        }
    }
}

// ── Notifications ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawNotifications {
    default_duration_ms: u64,
    ready_duration_ms: u64,
    toggle_duration_ms: u64,
    slide_speed: f32,
}

impl Default for RawNotifications {
    fn default() -> Self {
        Self {
            default_duration_ms: 3000,
            ready_duration_ms: 2000,
            toggle_duration_ms: 1500,
            slide_speed: 0.08,
        }
    }
}

// ── Theme ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawTheme {
    palette: RawPalette,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawPalette {
    accent: HexColor,
    cats: HexColor,
    dogs: HexColor,
    success: HexColor,
    error: HexColor,
    warning: HexColor,
    info: HexColor,
    text_primary: HexColor,
    text_dim: HexColor,
}

impl Default for RawPalette {
    fn default() -> Self {
        Self {
            accent: HexColor(Color::Rgb(120, 220, 255)),
            cats: HexColor(Color::Rgb(129, 140, 248)),
            dogs: HexColor(Color::Rgb(45, 212, 191)),
            success: HexColor(Color::Rgb(130, 235, 175)),
            error: HexColor(Color::Rgb(255, 140, 160)),
            warning: HexColor(Color::Rgb(255, 200, 120)),
            info: HexColor(Color::Rgb(180, 160, 255)),
            text_primary: HexColor(Color::Rgb(225, 223, 240)),
            text_dim: HexColor(Color::Rgb(120, 124, 150)),
        }
    }
}

// ── Keybindings ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawKeybindings {
    quit: String,
    vote_cats: String,
    vote_dogs: String,
    toggle_refresh: String,
    refresh: String,
    dismiss: String,
    next_toast: String,
    focus_error: String,
    help: String,
}

impl Default for RawKeybindings {
    fn default() -> Self {
        Self {
            quit: "q".into(),
            vote_cats: "c".into(),
            vote_dogs: "d".into(),
            toggle_refresh: "a".into(),
            refresh: "r".into(),
            dismiss: "x".into(),
            next_toast: "Tab".into(),
            focus_error: "e".into(),
            help: "?".into(),
        }
    }
}

// ─── Resolved runtime config ────────────────────────────────────────────────
//
// These are the structs the rest of the app interacts with. All values are
// validated, clamped, and ready to use.

/// Fully resolved, runtime-ready configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub general: GeneralConfig,
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub notifications: NotificationsConfig,
    pub theme: ThemeConfig,
    pub keys: KeybindingsConfig,
}

#[derive(Debug, Clone)]
pub struct GeneralConfig {
    pub tick_rate_ms: u64,
    pub results_panel_percent: u16,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub health_path: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub auto_refresh: bool,
    /// Show a toast when a poll fails on a plain network error.
    pub warn_on_network_error: bool,
}

#[derive(Debug, Clone)]
pub struct NotificationsConfig {
    pub default_duration_ms: u64,
    pub ready_duration_ms: u64,
    pub toggle_duration_ms: u64,
    pub slide_speed: f32,
}

#[derive(Debug, Clone)]
pub struct ThemeConfig {
    pub palette: Palette,
}

/// Resolved colour palette.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent: Color,
    pub cats: Color,
    pub dogs: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
    pub text_primary: Color,
    pub text_dim: Color,
}

/// Pre-parsed keybindings, each ready for matching.
#[derive(Debug, Clone)]
pub struct KeybindingsConfig {
    pub quit: KeyCode,
    pub vote_cats: KeyCode,
    pub vote_dogs: KeyCode,
    pub toggle_refresh: KeyCode,
    pub refresh: KeyCode,
    pub dismiss: KeyCode,
    pub next_toast: KeyCode,
    pub focus_error: KeyCode,
    pub help: KeyCode,
}

// ─── Raw → Resolved conversion ─────────────────────────────────────────────

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let health_path = if raw.api.health_path.starts_with('/') {
            raw.api.health_path
        } else {
            format!("/{}", raw.api.health_path)
        };

        Self {
            general: GeneralConfig {
                tick_rate_ms: raw.general.tick_rate_ms.clamp(4, 200),
                results_panel_percent: raw.general.results_panel_percent.clamp(30, 80),
            },
            api: ApiConfig {
                base_url: raw.api.base_url,
                health_path,
                request_timeout_secs: raw.api.request_timeout_secs.clamp(1, 60),
            },
            polling: PollingConfig {
                interval_ms: raw.polling.interval_ms.clamp(500, 60_000),
                auto_refresh: raw.polling.auto_refresh,
                warn_on_network_error: raw.polling.warn_on_network_error,
            },
            notifications: NotificationsConfig {
                default_duration_ms: raw.notifications.default_duration_ms.clamp(500, 30_000),
                ready_duration_ms: raw.notifications.ready_duration_ms.clamp(500, 30_000),
                toggle_duration_ms: raw.notifications.toggle_duration_ms.clamp(500, 30_000),
                slide_speed: raw.notifications.slide_speed.clamp(0.01, 1.0),
            },
            theme: ThemeConfig {
                palette: Palette {
                    accent: raw.theme.palette.accent.0,
                    cats: raw.theme.palette.cats.0,
                    dogs: raw.theme.palette.dogs.0,
                    success: raw.theme.palette.success.0,
                    error: raw.theme.palette.error.0,
                    warning: raw.theme.palette.warning.0,
                    info: raw.theme.palette.info.0,
                    text_primary: raw.theme.palette.text_primary.0,
                    text_dim: raw.theme.palette.text_dim.0,
                },
            },
            keys: KeybindingsConfig {
                quit: parse_key(&raw.keybindings.quit),
                vote_cats: parse_key(&raw.keybindings.vote_cats),
                vote_dogs: parse_key(&raw.keybindings.vote_dogs),
                toggle_refresh: parse_key(&raw.keybindings.toggle_refresh),
                refresh: parse_key(&raw.keybindings.refresh),
                dismiss: parse_key(&raw.keybindings.dismiss),
                next_toast: parse_key(&raw.keybindings.next_toast),
                focus_error: parse_key(&raw.keybindings.focus_error),
                help: parse_key(&raw.keybindings.help),
            },
        }
    }
}

/// Parse a human-readable key name into a crossterm `KeyCode`.
fn parse_key(s: &str) -> KeyCode {
    let mut chars = s.chars();
    match (s, chars.next(), chars.next()) {
        ("Enter", ..) => KeyCode::Enter,
        ("Esc", ..) => KeyCode::Esc,
        ("Tab", ..) => KeyCode::Tab,
        ("Backspace", ..) => KeyCode::Backspace,
        ("Space", ..) => KeyCode::Char(' '),
        ("Up", ..) => KeyCode::Up,
        ("Down", ..) => KeyCode::Down,
        ("Left", ..) => KeyCode::Left,
        ("Right", ..) => KeyCode::Right,
        ("Home", ..) => KeyCode::Home,
        ("End", ..) => KeyCode::End,
        ("Delete", ..) => KeyCode::Delete,
        (_, Some(c), None) => KeyCode::Char(c),
        (other, ..) => {
            warn!("Unknown keybinding \"{other}\" in config, ignoring");
            KeyCode::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn embedded_defaults_parse() {
        let raw: RawConfig = toml::from_str(DEFAULT_CONFIG_STR).unwrap();
        let cfg = Config::from(raw);
        assert_eq!(cfg.polling.interval_ms, 3000);
        assert!(cfg.polling.auto_refresh);
        assert!(!cfg.polling.warn_on_network_error);
        assert_eq!(cfg.api.health_path, "/");
        assert_eq!(cfg.keys.vote_cats, KeyCode::Char('c'));
        assert_eq!(cfg.keys.next_toast, KeyCode::Tab);
        assert_eq!(cfg.keys.focus_error, KeyCode::Char('e'));
        assert_eq!(cfg.notifications.default_duration_ms, 3000);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let raw: RawConfig = toml::from_str(
            r#"
            [polling]
            interval_ms = 10

            [api]
            health_path = "health"
            request_timeout_secs = 0
            "#,
        )
        .unwrap();
        let cfg = Config::from(raw);
        assert_eq!(cfg.polling.interval_ms, 500);
        assert_eq!(cfg.api.request_timeout_secs, 1);
        assert_eq!(cfg.api.health_path, "/health");
        // Untouched sections keep their defaults.
        assert_eq!(cfg.general.tick_rate_ms, 16);
    }

    #[test]
    fn key_names_parse() {
        assert_eq!(parse_key("Esc"), KeyCode::Esc);
        assert_eq!(parse_key("?"), KeyCode::Char('?'));
        assert_eq!(parse_key("é"), KeyCode::Char('é'));
        assert_eq!(parse_key("Hyper"), KeyCode::Null);
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex_color("#00D4FF"), Some(Color::Rgb(0, 212, 255)));
        assert_eq!(parse_hex_color("zz0000"), None);
        assert_eq!(parse_hex_color("#123"), None);
    }
}
