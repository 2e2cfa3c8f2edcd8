use crate::common::env::FromEnv;
use std::env;
use std::net::IpAddr;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::Level;

pub struct AppSettings {
    pub app_component: String,
    pub level: Level,
    pub app_host: IpAddr,
    pub app_port: u16,

    pub data_dir: PathBuf,
    pub modified_index_path: PathBuf,
    pub using_wsl: bool,
    pub current_profile: Option<String>,

    pub osu_api_base_url: String,
    pub osu_api_key: String,
    pub osu_files_base_url: String,
}

impl AppSettings {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();

        let app_component = env::var("APP_COMPONENT")?;
        let level = Level::from_env("LOG_LEVEL")?;
        let app_host = IpAddr::from_env("APP_HOST")?;
        let app_port = u16::from_env("APP_PORT")?;

        let data_dir = PathBuf::from_env("DATA_DIR")?;
        let modified_index_path = PathBuf::from_env("MODIFIED_INDEX_PATH")?;
        let using_wsl = bool::from_env_or("USING_WSL", false)?;
        let current_profile = env::var("CURRENT_PROFILE").ok();

        let osu_api_base_url = String::from_env_or("OSU_API_BASE_URL", "https://osu.ppy.sh".to_owned())?;
        let osu_api_key = env::var("OSU_API_KEY")?;
        let osu_files_base_url =
            String::from_env_or("OSU_FILES_BASE_URL", "https://osu.ppy.sh/osu".to_owned())?;

        Ok(AppSettings {
            app_component,
            level,
            app_host,
            app_port,

            data_dir,
            modified_index_path,
            using_wsl,
            current_profile,

            osu_api_base_url,
            osu_api_key,
            osu_files_base_url,
        })
    }

    pub fn beatmaps_path(&self) -> PathBuf {
        self.data_dir.join("beatmaps.json")
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.data_dir.join("profiles.json")
    }

    pub fn get() -> &'static AppSettings {
        settings()
    }
}

pub fn settings() -> &'static AppSettings {
    static SETTINGS: LazyLock<AppSettings> =
        LazyLock::new(|| AppSettings::load_from_env().expect("Failed to load settings"));
    SETTINGS.deref()
}
