//! # Políticas de ranking
//!
//! Cada política é uma ordem total sobre [`DeviceDescriptor`]: uma cadeia
//! lexicográfica fixa de campos, todos decrescentes, terminando no
//! `native_id` como desempate final.
//!
//! | Política | Cadeia |
//! |---|---|
//! | `Generation` | major, minor, flops, memória, native_id |
//! | `Flops` | flops, memória, major, minor, native_id |
//! | `Memory` | memória, flops, major, minor, native_id |
//! | `Identity` | native_id (crescente: ordem de enumeração) |
//!
//! Ranquear permuta a lista de dispositivos. Índices lógicos obtidos antes de
//! um ranking deixam de apontar para o mesmo dispositivo físico depois dele.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::descriptor::DeviceDescriptor;
use crate::error::DeviceError;

/// Política de ordenação da lista de dispositivos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Geração do hardware primeiro
    Generation,
    /// Score teórico primeiro
    Flops,
    /// Memória global primeiro
    Memory,
    /// Ordem de enumeração da plataforma
    #[default]
    Identity,
}

impl RankingPolicy {
    pub const ALL: [Self; 4] = [Self::Generation, Self::Flops, Self::Memory, Self::Identity];

    /// Nome da política
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::Flops => "flops",
            Self::Memory => "memory",
            Self::Identity => "identity",
        }
    }

    /// `Less` quando `a` vem antes de `b` (ranqueia acima)
    pub fn ordering(&self, a: &DeviceDescriptor, b: &DeviceDescriptor) -> Ordering {
        let (pa, pb) = (a.properties(), b.properties());
        match self {
            Self::Generation => pb
                .major
                .cmp(&pa.major)
                .then_with(|| pb.minor.cmp(&pa.minor))
                .then_with(|| b.flops().cmp(&a.flops()))
                .then_with(|| pb.total_global_mem.cmp(&pa.total_global_mem))
                .then_with(|| b.native_id().cmp(&a.native_id())),
            Self::Flops => b
                .flops()
                .cmp(&a.flops())
                .then_with(|| pb.total_global_mem.cmp(&pa.total_global_mem))
                .then_with(|| pb.major.cmp(&pa.major))
                .then_with(|| pb.minor.cmp(&pa.minor))
                .then_with(|| b.native_id().cmp(&a.native_id())),
            Self::Memory => pb
                .total_global_mem
                .cmp(&pa.total_global_mem)
                .then_with(|| b.flops().cmp(&a.flops()))
                .then_with(|| pb.major.cmp(&pa.major))
                .then_with(|| pb.minor.cmp(&pa.minor))
                .then_with(|| b.native_id().cmp(&a.native_id())),
            Self::Identity => a.native_id().cmp(&b.native_id()),
        }
    }

    /// `a` não ranqueia estritamente abaixo de `b`
    #[inline]
    pub fn ranks_at_or_above(&self, a: &DeviceDescriptor, b: &DeviceDescriptor) -> bool {
        self.ordering(a, b) != Ordering::Greater
    }

    /// Ordena `devices` in place
    pub fn sort(&self, devices: &mut [DeviceDescriptor]) {
        devices.sort_by(|a, b| self.ordering(a, b));
    }
}

impl fmt::Display for RankingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RankingPolicy {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generation" | "compute" => Ok(Self::Generation),
            "flops" | "score" => Ok(Self::Flops),
            "memory" | "mem" => Ok(Self::Memory),
            "identity" | "none" => Ok(Self::Identity),
            other => Err(DeviceError::InvalidConfig(format!(
                "política de ranking desconhecida: '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cores::CoreTable;
    use crate::properties::{DeviceProperties, MIB};

    fn device(
        native_id: usize,
        major: u32,
        minor: u32,
        units: u32,
        mem_mb: u64,
    ) -> DeviceDescriptor {
        let props = DeviceProperties::new(format!("dev{}", native_id), mem_mb * MIB, major, minor)
            .with_compute_units(units)
            .with_clock_rate_khz(1000);
        DeviceDescriptor::new(native_id, props, &CoreTable::builtin())
    }

    fn ids(devices: &[DeviceDescriptor]) -> Vec<usize> {
        devices.iter().map(|d| d.native_id()).collect()
    }

    #[test]
    fn test_generation_scenario() {
        let mut devices = vec![
            device(0, 3, 5, 8, 4096),
            device(1, 5, 0, 8, 4096),
            device(2, 2, 0, 8, 4096),
        ];
        RankingPolicy::Generation.sort(&mut devices);
        assert_eq!(ids(&devices), vec![1, 0, 2]);
    }

    #[test]
    fn test_flops_ranking_uses_full_chain() {
        // Mesmo score: memória decide
        let mut devices = vec![
            device(0, 3, 5, 4, 2048),
            device(1, 3, 5, 4, 8192),
            device(2, 3, 0, 8, 1024),
        ];
        RankingPolicy::Flops.sort(&mut devices);
        assert_eq!(ids(&devices), vec![2, 1, 0]);
    }

    #[test]
    fn test_memory_ranking() {
        let mut devices = vec![
            device(0, 5, 0, 16, 2048),
            device(1, 2, 0, 1, 16384),
            device(2, 3, 5, 4, 8192),
        ];
        RankingPolicy::Memory.sort(&mut devices);
        assert_eq!(ids(&devices), vec![1, 2, 0]);
    }

    #[test]
    fn test_identity_restores_enumeration_order() {
        let mut devices = vec![device(0, 2, 0, 1, 1), device(1, 5, 0, 8, 8), device(2, 3, 5, 4, 4)];
        RankingPolicy::Flops.sort(&mut devices);
        assert_ne!(ids(&devices), vec![0, 1, 2]);

        RankingPolicy::Identity.sort(&mut devices);
        assert_eq!(ids(&devices), vec![0, 1, 2]);
    }

    #[test]
    fn test_unknown_generation_sinks_under_flops() {
        let mut devices = vec![
            device(0, 42, 0, 8, 4096),
            device(1, 2, 0, 8, 4096),
            device(2, 3, 0, 8, 4096),
        ];
        RankingPolicy::Flops.sort(&mut devices);
        assert_eq!(devices.last().map(|d| d.native_id()), Some(0));
        assert_eq!(devices[2].flops(), 0);
    }

    #[test]
    fn test_strict_total_order() {
        // Dispositivos idênticos exceto pelo id: só o native_id decide
        let devices: Vec<_> = (0..4).map(|i| device(i, 3, 5, 4, 4096)).collect();

        for policy in RankingPolicy::ALL {
            for a in &devices {
                for b in &devices {
                    let ab = policy.ordering(a, b);
                    let ba = policy.ordering(b, a);
                    assert_eq!(ab, ba.reverse(), "{} não é antissimétrica", policy);
                    if a.native_id() == b.native_id() {
                        assert_eq!(ab, Ordering::Equal);
                    } else {
                        assert_ne!(ab, Ordering::Equal, "{} empata dispositivos distintos", policy);
                        assert!(policy.ranks_at_or_above(a, b) ^ policy.ranks_at_or_above(b, a));
                    }
                }
            }
        }
    }

    #[test]
    fn test_sort_is_idempotent() {
        let base = vec![
            device(0, 3, 5, 4, 4096),
            device(1, 5, 0, 2, 2048),
            device(2, 3, 5, 4, 4096),
            device(3, 2, 1, 16, 8192),
        ];

        for policy in RankingPolicy::ALL {
            let mut once = base.clone();
            policy.sort(&mut once);
            let mut twice = once.clone();
            policy.sort(&mut twice);
            assert_eq!(ids(&once), ids(&twice), "{} não é idempotente", policy);
        }
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("generation".parse::<RankingPolicy>().unwrap(), RankingPolicy::Generation);
        assert_eq!("compute".parse::<RankingPolicy>().unwrap(), RankingPolicy::Generation);
        assert_eq!(" Score ".parse::<RankingPolicy>().unwrap(), RankingPolicy::Flops);
        assert_eq!("mem".parse::<RankingPolicy>().unwrap(), RankingPolicy::Memory);
        assert_eq!("none".parse::<RankingPolicy>().unwrap(), RankingPolicy::Identity);
        assert!("fastest".parse::<RankingPolicy>().is_err());
        assert_eq!(RankingPolicy::default(), RankingPolicy::Identity);
    }
}
