//! Propriedades de dispositivo fornecidas pela plataforma

use serde::{Deserialize, Serialize};

/// Bytes em um mebibyte
pub const MIB: u64 = 1024 * 1024;

/// Propriedades brutas de um dispositivo acelerador
///
/// Preenchidas uma única vez pela plataforma (`Platform::device_properties`)
/// e imutáveis depois disso. Campos opcionais para exibição têm default,
/// permitindo descrever dispositivos simulados em JSON só com o essencial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProperties {
    /// Nome do dispositivo
    pub name: String,
    /// Memória global total em bytes
    pub total_global_mem: u64,
    /// Geração do hardware (major)
    pub major: u32,
    /// Geração do hardware (minor)
    pub minor: u32,
    /// Número de unidades de computação (multiprocessadores)
    pub multi_processor_count: u32,
    /// Clock em kHz
    pub clock_rate_khz: u32,
    /// Largura do warp
    #[serde(default = "default_warp_size")]
    pub warp_size: u32,
    /// Máximo de threads por bloco
    #[serde(default = "default_max_threads_per_block")]
    pub max_threads_per_block: u32,
    /// Memória compartilhada por bloco em bytes
    #[serde(default)]
    pub shared_mem_per_block: u64,
    /// Identificador PCI (domínio:barramento:dispositivo), se conhecido
    #[serde(default)]
    pub pci_bus_id: Option<String>,
    /// GPU integrada (memória compartilhada com o host)
    #[serde(default)]
    pub integrated: bool,
}

fn default_warp_size() -> u32 {
    32
}

fn default_max_threads_per_block() -> u32 {
    1024
}

impl DeviceProperties {
    /// Cria propriedades com os campos obrigatórios
    pub fn new(name: impl Into<String>, total_global_mem: u64, major: u32, minor: u32) -> Self {
        Self {
            name: name.into(),
            total_global_mem,
            major,
            minor,
            multi_processor_count: 1,
            clock_rate_khz: 1_000_000,
            warp_size: default_warp_size(),
            max_threads_per_block: default_max_threads_per_block(),
            shared_mem_per_block: 48 * 1024,
            pci_bus_id: None,
            integrated: false,
        }
    }

    /// Define número de unidades de computação
    pub fn with_compute_units(mut self, count: u32) -> Self {
        self.multi_processor_count = count;
        self
    }

    /// Define clock em kHz
    pub fn with_clock_rate_khz(mut self, khz: u32) -> Self {
        self.clock_rate_khz = khz;
        self
    }

    /// Define identificador PCI
    pub fn with_pci_bus_id(mut self, id: impl Into<String>) -> Self {
        self.pci_bus_id = Some(id.into());
        self
    }

    /// Marca como GPU integrada
    pub fn integrated(mut self) -> Self {
        self.integrated = true;
        self
    }

    /// Geração do hardware (major, minor)
    #[inline]
    pub fn compute_capability(&self) -> (u32, u32) {
        (self.major, self.minor)
    }

    /// Memória total em MB, arredondada para cima
    #[inline]
    pub fn memory_mb(&self) -> u64 {
        memory_mb(self.total_global_mem)
    }
}

/// Converte bytes para MB arredondando para cima (qualquer resto soma 1 MB)
#[inline]
pub fn memory_mb(bytes: u64) -> u64 {
    bytes / MIB + u64::from(bytes % MIB != 0)
}
