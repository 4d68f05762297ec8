use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Vendor catalog (CAB archive containing products.xml).
pub const DEFAULT_CATALOG_URL: &str = "https://go.microsoft.com/fwlink/?LinkId=2156292";

/// Edition to look up in the catalog when none is given on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub language: String,
    pub edition: String,
    pub architecture: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            language: "en-us".to_string(),
            edition: "EnterpriseN".to_string(),
            architecture: "x64".to_string(),
        }
    }
}

/// Discovery probe parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-probe timeout in seconds; a timed-out probe counts as a miss.
    pub timeout_secs: u64,
    /// Browser-like User-Agent sent to the API endpoints.
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36".to_string(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Point-in-time CDN layout used by the heuristic resolver.
///
/// None of these can be verified structurally, only by probing, so they live
/// here rather than in code and can be replaced without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Extension a discovered URL must carry (e.g. ".iso").
    pub target_extension: String,
    /// API-like endpoints scanned for embedded URLs and link identifiers, in order.
    pub api_endpoints: Vec<String>,
    /// Redirect service prefix; a link identifier is appended to it.
    pub link_redirect_base: String,
    /// CDN base paths tried in stage 2 (outer loop).
    pub base_paths: Vec<String>,
    /// File names tried under each base path (inner loop).
    pub file_names: Vec<String>,
    /// Known-good redirect link returned when everything else misses.
    pub fallback_url: String,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            target_extension: ".iso".to_string(),
            api_endpoints: vec![
                "https://www.microsoft.com/en-us/evalcenter/api/products/getproducts".to_string(),
                "https://www.microsoft.com/en-us/api/controls/contentinclude/html?pageId=cfa0e580-a81e-4a4b-a846-7b21bf4e2e5b&host=www.microsoft.com&segments=software-download,windows10ISO".to_string(),
                "https://www.microsoft.com/en-us/software-download/windows10ISO/ajax".to_string(),
            ],
            link_redirect_base: "https://go.microsoft.com/fwlink/?LinkID=".to_string(),
            base_paths: vec![
                "https://software-static.download.prss.microsoft.com/sg/download/888969d5-f34g-4e03-ac9d-1f9786c66749/".to_string(),
                "https://software-static.download.prss.microsoft.com/dbazure/".to_string(),
                "https://software.download.prss.microsoft.com/sg/".to_string(),
            ],
            file_names: vec![
                "19045.2006.220908-0225.22h2_release_svc_refresh_CLIENTENTERPRISEEVAL_OEMRET_x64FRE_en-us.iso".to_string(),
                "Win10_22H2_EnterpriseEval_x64.iso".to_string(),
                "Win10_22H2_English_x64.iso".to_string(),
                "Win10_22H2_English_x64v1.iso".to_string(),
                "SERVER_EVAL_x64FRE_en-us.iso".to_string(),
            ],
            fallback_url: "https://go.microsoft.com/fwlink/?LinkID=2195280&clcid=0x409&culture=en-us&country=US".to_string(),
        }
    }
}

/// Conventional local file names for downloaded and converted images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub esd_file: PathBuf,
    pub wim_file: PathBuf,
    pub iso_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            esd_file: PathBuf::from("win.esd"),
            wim_file: PathBuf::from("win.wim"),
            iso_file: PathBuf::from("win.iso"),
        }
    }
}

/// Global configuration loaded from `~/.config/winfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WinfetchConfig {
    /// Catalog archive URL used by the catalog resolver.
    pub catalog_url: String,
    pub query: QueryConfig,
    pub probe: ProbeConfig,
    pub heuristic: HeuristicConfig,
    pub output: OutputConfig,
}

impl Default for WinfetchConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            query: QueryConfig::default(),
            probe: ProbeConfig::default(),
            heuristic: HeuristicConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("winfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WinfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WinfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: WinfetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
