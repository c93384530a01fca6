//! Descritor de dispositivo: identidade, propriedades e score derivado

use serde::Serialize;

use crate::cores::CoreTable;
use crate::properties::DeviceProperties;

/// Um dispositivo descoberto
///
/// `native_id` é o índice atribuído pela plataforma, estável durante todo o
/// processo e único entre os descritores. O índice lógico usado pela API do
/// registro é a posição do descritor na lista ranqueada, não este id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    native_id: usize,
    properties: DeviceProperties,
    flops: u64,
}

impl DeviceDescriptor {
    /// Cria descritor calculando o score com a tabela de núcleos
    pub fn new(native_id: usize, properties: DeviceProperties, cores: &CoreTable) -> Self {
        let flops = flops_score(&properties, cores);
        Self {
            native_id,
            properties,
            flops,
        }
    }

    /// Índice nativo da plataforma
    #[inline]
    pub fn native_id(&self) -> usize {
        self.native_id
    }

    #[inline]
    pub fn properties(&self) -> &DeviceProperties {
        &self.properties
    }

    /// Score teórico (unidades × núcleos por unidade × clock)
    #[inline]
    pub fn flops(&self) -> u64 {
        self.flops
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.properties.name
    }
}

/// `compute_units × cores_per_unit(major, minor) × clock_rate`
///
/// Heurística só para ranking relativo; satura em vez de estourar.
pub fn flops_score(properties: &DeviceProperties, cores: &CoreTable) -> u64 {
    let per_unit = cores.cores_per_unit(properties.major, properties.minor);
    u64::from(properties.multi_processor_count)
        .saturating_mul(u64::from(per_unit))
        .saturating_mul(u64::from(properties.clock_rate_khz))
}
