//! Configuração do registro de dispositivos
//!
//! Valores vêm de código (builders) ou do ambiente/.env:
//!
//! - `SIL_DEVICE_RANKING`: política inicial (`identity`, `generation`, `flops`, `memory`)
//! - `SIL_DEVICE_DEFAULT`: índice lógico ativo após o ranking inicial
//! - `SIL_DEVICE_CORE_TABLE`: JSON com gerações extras para a tabela de núcleos

use std::env;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::cores::CoreTable;
use crate::error::DeviceResult;
use crate::ranking::RankingPolicy;

pub const RANKING_ENV: &str = "SIL_DEVICE_RANKING";
pub const DEFAULT_DEVICE_ENV: &str = "SIL_DEVICE_DEFAULT";
pub const CORE_TABLE_ENV: &str = "SIL_DEVICE_CORE_TABLE";

// Carrega .env uma única vez, no primeiro acesso ao módulo
static DOTENV_INIT: Lazy<()> = Lazy::new(|| {
    let _ = dotenv::dotenv();
});

#[inline]
pub(crate) fn ensure_loaded() {
    let _ = &*DOTENV_INIT;
}

/// Configuração aplicada na inicialização do registro
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Política aplicada logo após a descoberta
    pub default_policy: RankingPolicy,
    /// Índice lógico selecionado após o ranking inicial
    pub default_device: usize,
    /// Arquivo JSON mesclado sobre a tabela de núcleos embutida
    pub core_table_path: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_policy: RankingPolicy::Identity,
            default_device: 0,
            core_table_path: None,
        }
    }
}

impl RegistryConfig {
    /// Define política inicial
    pub fn with_policy(mut self, policy: RankingPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Define dispositivo lógico inicial
    pub fn with_default_device(mut self, index: usize) -> Self {
        self.default_device = index;
        self
    }

    /// Define arquivo de gerações extras
    pub fn with_core_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.core_table_path = Some(path.into());
        self
    }

    /// Lê a configuração do ambiente (carregando `.env` se existir)
    pub fn from_env() -> Self {
        ensure_loaded();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Lê a configuração a partir de uma função de lookup
    ///
    /// Valores inválidos caem no default com aviso.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(RANKING_ENV) {
            match value.parse::<RankingPolicy>() {
                Ok(policy) => config.default_policy = policy,
                Err(err) => tracing::warn!(var = RANKING_ENV, %err, "ignoring ranking policy"),
            }
        }

        if let Some(value) = lookup(DEFAULT_DEVICE_ENV) {
            match value.trim().parse::<usize>() {
                Ok(index) => config.default_device = index,
                Err(err) => tracing::warn!(
                    var = DEFAULT_DEVICE_ENV,
                    value = %value,
                    %err,
                    "ignoring default device"
                ),
            }
        }

        if let Some(path) = lookup(CORE_TABLE_ENV).filter(|p| !p.trim().is_empty()) {
            config.core_table_path = Some(PathBuf::from(path.trim()));
        }

        config
    }

    /// Tabela de núcleos: embutida + arquivo configurado
    pub fn core_table(&self) -> DeviceResult<CoreTable> {
        let mut table = CoreTable::builtin();
        if let Some(path) = &self.core_table_path {
            table.merge_file(path)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_config_builder() {
        let config = RegistryConfig::default()
            .with_policy(RankingPolicy::Flops)
            .with_default_device(2)
            .with_core_table("/etc/sil/cores.json");

        assert_eq!(config.default_policy, RankingPolicy::Flops);
        assert_eq!(config.default_device, 2);
        assert_eq!(config.core_table_path, Some(PathBuf::from("/etc/sil/cores.json")));
    }

    #[test]
    fn test_from_vars() {
        let config = RegistryConfig::from_vars(lookup(&[
            (RANKING_ENV, "memory"),
            (DEFAULT_DEVICE_ENV, " 1 "),
            (CORE_TABLE_ENV, "cores.json"),
        ]));

        assert_eq!(config.default_policy, RankingPolicy::Memory);
        assert_eq!(config.default_device, 1);
        assert_eq!(config.core_table_path, Some(PathBuf::from("cores.json")));
    }

    #[test]
    fn test_from_vars_invalid_falls_back() {
        let config = RegistryConfig::from_vars(lookup(&[
            (RANKING_ENV, "fastest"),
            (DEFAULT_DEVICE_ENV, "-1"),
        ]));
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn test_core_table_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cores.json");
        std::fs::write(&path, r#"{"generations":[{"major":12,"minor":0,"cores":128}]}"#).unwrap();

        let table = RegistryConfig::default().with_core_table(&path).core_table().unwrap();
        assert_eq!(table.cores_per_unit(12, 0), 128);
        assert_eq!(table.cores_per_unit(3, 5), 192);
    }

    #[test]
    fn test_core_table_missing_file() {
        let config = RegistryConfig::default().with_core_table("/nonexistent/cores.json");
        assert!(config.core_table().is_err());
    }
}
