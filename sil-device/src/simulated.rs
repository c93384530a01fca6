//! # Plataforma simulada
//!
//! Implementação determinística de [`Platform`] sem hardware, usada em
//! testes, CI e quando nenhuma plataforma real foi instalada no processo.
//! Os dispositivos vêm de um builder ou de um arquivo JSON:
//!
//! ```json
//! {
//!   "backend": "CUDA",
//!   "runtime_version": 6050,
//!   "driver_version": "346.46",
//!   "devices": [
//!     { "name": "Tesla K40c", "total_global_mem": 12079136768,
//!       "major": 3, "minor": 5, "multi_processor_count": 15,
//!       "clock_rate_khz": 745000 }
//!   ]
//! }
//! ```
//!
//! Falhas podem ser injetadas por chamada para exercitar os caminhos de erro.

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{DeviceError, DeviceResult};
use crate::platform::Platform;
use crate::properties::DeviceProperties;

/// Variável de ambiente com o caminho do JSON da plataforma simulada
pub const SIM_FILE_ENV: &str = "SIL_DEVICE_SIM_FILE";

/// Descrição serializável da plataforma simulada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_runtime_version")]
    pub runtime_version: i32,
    #[serde(default)]
    pub driver_version: Option<String>,
    #[serde(default)]
    pub driver_version_code: Option<i32>,
    #[serde(default)]
    pub devices: Vec<DeviceProperties>,
}

fn default_backend() -> String {
    "CUDA".to_string()
}

fn default_runtime_version() -> i32 {
    6050
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            runtime_version: default_runtime_version(),
            driver_version: None,
            driver_version_code: None,
            devices: Vec::new(),
        }
    }
}

/// Falhas injetadas
#[derive(Debug, Clone, Default)]
struct Faults {
    count: Option<String>,
    properties: Option<usize>,
    select: Option<usize>,
    runtime: bool,
}

/// Plataforma simulada
#[derive(Debug)]
pub struct SimulatedPlatform {
    config: SimulatedConfig,
    faults: Faults,
    selected: Mutex<Option<usize>>,
    select_calls: AtomicUsize,
    enumerations: AtomicUsize,
}

impl Default for SimulatedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPlatform {
    /// Plataforma sem dispositivos
    pub fn new() -> Self {
        Self::from_config(SimulatedConfig::default())
    }

    pub fn from_config(config: SimulatedConfig) -> Self {
        Self {
            config,
            faults: Faults::default(),
            selected: Mutex::new(None),
            select_calls: AtomicUsize::new(0),
            enumerations: AtomicUsize::new(0),
        }
    }

    /// Carrega a descrição de um JSON
    pub fn from_json_str(json: &str) -> DeviceResult<Self> {
        let config: SimulatedConfig = serde_json::from_str(json)?;
        Ok(Self::from_config(config))
    }

    /// Carrega a descrição de um arquivo JSON
    pub fn from_file(path: impl AsRef<Path>) -> DeviceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Carrega de `SIL_DEVICE_SIM_FILE` (ambiente ou `.env`); sem a variável,
    /// plataforma vazia
    pub fn from_env() -> DeviceResult<Self> {
        config::ensure_loaded();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Como [`from_env`](Self::from_env), a partir de uma função de lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> DeviceResult<Self> {
        match lookup(SIM_FILE_ENV) {
            Some(path) if !path.trim().is_empty() => {
                tracing::debug!(path = %path, "loading simulated platform");
                Self::from_file(path.trim())
            }
            _ => Ok(Self::new()),
        }
    }

    /// Adiciona dispositivo (índice nativo = ordem de inserção)
    pub fn with_device(mut self, properties: DeviceProperties) -> Self {
        self.config.devices.push(properties);
        self
    }

    pub fn with_devices(mut self, devices: impl IntoIterator<Item = DeviceProperties>) -> Self {
        self.config.devices.extend(devices);
        self
    }

    pub fn with_backend(mut self, name: impl Into<String>) -> Self {
        self.config.backend = name.into();
        self
    }

    pub fn with_runtime_version(mut self, version: i32) -> Self {
        self.config.runtime_version = version;
        self
    }

    /// Versão do driver pelo caminho rápido
    pub fn with_driver_version(mut self, version: impl Into<String>) -> Self {
        self.config.driver_version = Some(version.into());
        self
    }

    /// Versão do driver pelo runtime (caminho alternativo)
    pub fn with_driver_version_code(mut self, code: i32) -> Self {
        self.config.driver_version_code = Some(code);
        self
    }

    /// Enumeração falha
    pub fn failing_count(mut self, message: impl Into<String>) -> Self {
        self.faults.count = Some(message.into());
        self
    }

    /// Consulta de propriedades falha para `native_id`
    pub fn failing_properties(mut self, native_id: usize) -> Self {
        self.faults.properties = Some(native_id);
        self
    }

    /// Seleção falha para `native_id`
    pub fn failing_select(mut self, native_id: usize) -> Self {
        self.faults.select = Some(native_id);
        self
    }

    /// Consulta de versão do runtime falha
    pub fn failing_runtime(mut self) -> Self {
        self.faults.runtime = true;
        self
    }

    pub fn config(&self) -> &SimulatedConfig {
        &self.config
    }

    /// Último dispositivo nativo selecionado com sucesso
    pub fn selected_native_id(&self) -> Option<usize> {
        *self.selected.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Chamadas de seleção bem-sucedidas
    pub fn select_calls(&self) -> usize {
        self.select_calls.load(Ordering::Acquire)
    }

    /// Chamadas de enumeração
    pub fn enumerations(&self) -> usize {
        self.enumerations.load(Ordering::Acquire)
    }
}

impl Platform for SimulatedPlatform {
    fn backend_name(&self) -> &str {
        &self.config.backend
    }

    fn device_count(&self) -> DeviceResult<usize> {
        self.enumerations.fetch_add(1, Ordering::AcqRel);
        match &self.faults.count {
            Some(message) => Err(DeviceError::platform("device_count", message.clone())),
            None => Ok(self.config.devices.len()),
        }
    }

    fn device_properties(&self, native_id: usize) -> DeviceResult<DeviceProperties> {
        if self.faults.properties == Some(native_id) {
            return Err(DeviceError::platform(
                "device_properties",
                format!("query failed for device {}", native_id),
            ));
        }

        self.config.devices.get(native_id).cloned().ok_or_else(|| {
            DeviceError::platform(
                "device_properties",
                format!("invalid device ordinal {}", native_id),
            )
        })
    }

    fn select_device(&self, native_id: usize) -> DeviceResult<()> {
        if native_id >= self.config.devices.len() {
            return Err(DeviceError::platform(
                "select_device",
                format!("invalid device ordinal {}", native_id),
            ));
        }
        if self.faults.select == Some(native_id) {
            return Err(DeviceError::platform(
                "select_device",
                format!("context switch failed for device {}", native_id),
            ));
        }

        *self.selected.lock().unwrap_or_else(|e| e.into_inner()) = Some(native_id);
        self.select_calls.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn driver_version(&self) -> Option<String> {
        self.config.driver_version.clone()
    }

    fn driver_version_code(&self) -> DeviceResult<i32> {
        self.config.driver_version_code.ok_or(DeviceError::DriverUnavailable)
    }

    fn runtime_version(&self) -> DeviceResult<i32> {
        if self.faults.runtime {
            return Err(DeviceError::platform("runtime_version", "runtime not loaded"));
        }
        Ok(self.config.runtime_version)
    }
}
