//! # Tabela de núcleos por unidade de computação
//!
//! Mapeia a geração do hardware `(major, minor)` para o número de núcleos
//! escalares por unidade de computação. A busca é linear sobre pares
//! `(generation_code, cores)` com `generation_code = (major << 4) + minor`;
//! gerações desconhecidas retornam 0, o que afunda o dispositivo no ranking
//! por score.
//!
//! A tabela embutida cobre as gerações conhecidas em tempo de build. Novas
//! gerações entram sem recompilar via [`CoreTable::register`] ou um arquivo
//! JSON:
//!
//! ```json
//! { "generations": [ { "major": 9, "minor": 0, "cores": 128 } ] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, DeviceResult};

/// Gerações embutidas: (major, minor, núcleos por unidade)
const BUILTIN: &[(u32, u32, u32)] = &[
    (1, 0, 8),
    (1, 1, 8),
    (1, 2, 8),
    (1, 3, 8),
    (2, 0, 32),
    (2, 1, 48),
    (3, 0, 192),
    (3, 5, 192),
    (3, 7, 192),
    (5, 0, 128),
    (5, 2, 128),
    (5, 3, 128),
    (6, 0, 64),
    (6, 1, 128),
    (6, 2, 128),
    (7, 0, 64),
    (7, 2, 64),
    (7, 5, 64),
    (8, 0, 64),
    (8, 6, 128),
    (8, 7, 128),
    (8, 9, 128),
    (9, 0, 128),
];

/// Código de geração: `0xMm` (M = major, m = minor)
///
/// `None` quando `minor` não cabe em 4 bits ou `major` estoura o código.
#[inline]
pub const fn generation_code(major: u32, minor: u32) -> Option<u32> {
    if minor >= 16 || major > (u32::MAX >> 4) {
        return None;
    }
    Some((major << 4) | minor)
}

/// Entrada da tabela
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreEntry {
    pub major: u32,
    pub minor: u32,
    pub cores: u32,
}

impl CoreEntry {
    #[inline]
    pub fn code(&self) -> Option<u32> {
        generation_code(self.major, self.minor)
    }
}

/// Formato do arquivo de dados
#[derive(Debug, Default, Serialize, Deserialize)]
struct CoreTableFile {
    #[serde(default)]
    generations: Vec<CoreEntry>,
}

/// Tabela de núcleos por unidade, extensível em runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreTable {
    entries: Vec<CoreEntry>,
}

impl Default for CoreTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CoreTable {
    /// Tabela com as gerações conhecidas em tempo de build
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|&(major, minor, cores)| CoreEntry { major, minor, cores })
                .collect(),
        }
    }

    /// Tabela vazia (toda geração é desconhecida)
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Núcleos por unidade para a geração, 0 se desconhecida
    pub fn cores_per_unit(&self, major: u32, minor: u32) -> u32 {
        let Some(code) = generation_code(major, minor) else {
            return 0;
        };
        self.entries
            .iter()
            .find(|entry| entry.code() == Some(code))
            .map_or(0, |entry| entry.cores)
    }

    /// Registra (ou substitui) uma geração
    ///
    /// `minor` precisa caber em 4 bits, senão o código colide com outra geração.
    pub fn register(&mut self, major: u32, minor: u32, cores: u32) -> DeviceResult<()> {
        if generation_code(major, minor).is_none() {
            return Err(DeviceError::CoreTable(format!(
                "geração {}.{} não cabe no código de geração",
                major, minor
            )));
        }

        let entry = CoreEntry { major, minor, cores };
        match self.entries.iter_mut().find(|e| e.code() == entry.code()) {
            Some(existing) => existing.cores = cores,
            None => self.entries.push(entry),
        }
        Ok(())
    }

    /// Builder: registra geração
    pub fn with_generation(mut self, major: u32, minor: u32, cores: u32) -> DeviceResult<Self> {
        self.register(major, minor, cores)?;
        Ok(self)
    }

    /// Carrega somente as entradas do JSON (sem a tabela embutida)
    pub fn from_json_str(json: &str) -> DeviceResult<Self> {
        let mut table = Self::empty();
        table.merge_json_str(json)?;
        Ok(table)
    }

    /// Carrega somente as entradas do arquivo JSON
    pub fn from_file(path: impl AsRef<Path>) -> DeviceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Mescla entradas do JSON sobre a tabela atual; retorna quantas entradas leu
    pub fn merge_json_str(&mut self, json: &str) -> DeviceResult<usize> {
        let file: CoreTableFile = serde_json::from_str(json)?;
        for entry in &file.generations {
            self.register(entry.major, entry.minor, entry.cores)?;
        }
        Ok(file.generations.len())
    }

    /// Mescla entradas de um arquivo JSON sobre a tabela atual
    pub fn merge_file(&mut self, path: impl AsRef<Path>) -> DeviceResult<usize> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let count = self.merge_json_str(&content)?;
        tracing::debug!(path = %path.display(), entries = count, "core table merged");
        Ok(count)
    }

    /// Serializa a tabela no formato do arquivo de dados
    pub fn to_json(&self) -> DeviceResult<String> {
        let file = CoreTableFile {
            generations: self.entries.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoreEntry> {
        self.entries.iter()
    }
}

/// Núcleos por unidade segundo a tabela embutida
pub fn cores_per_unit(major: u32, minor: u32) -> u32 {
    let Some(code) = generation_code(major, minor) else {
        return 0;
    };
    BUILTIN
        .iter()
        .find(|&&(maj, min, _)| generation_code(maj, min) == Some(code))
        .map_or(0, |&(_, _, cores)| cores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_generations() {
        assert_eq!(cores_per_unit(1, 3), 8);
        assert_eq!(cores_per_unit(2, 0), 32);
        assert_eq!(cores_per_unit(2, 1), 48);
        assert_eq!(cores_per_unit(3, 5), 192);
        assert_eq!(cores_per_unit(5, 0), 128);
    }

    #[test]
    fn test_unknown_generation_is_zero() {
        assert_eq!(cores_per_unit(0, 9), 0);
        assert_eq!(cores_per_unit(99, 0), 0);
        assert_eq!(CoreTable::empty().cores_per_unit(3, 5), 0);
    }

    #[test]
    fn test_builtin_table_matches_free_function() {
        let table = CoreTable::builtin();
        for entry in table.iter() {
            assert_eq!(
                table.cores_per_unit(entry.major, entry.minor),
                cores_per_unit(entry.major, entry.minor)
            );
        }
    }

    #[test]
    fn test_register_new_generation() {
        let mut table = CoreTable::builtin();
        assert_eq!(table.cores_per_unit(12, 0), 0);

        table.register(12, 0, 128).unwrap();
        assert_eq!(table.cores_per_unit(12, 0), 128);

        // Substitui em vez de duplicar
        let len = table.len();
        table.register(12, 0, 256).unwrap();
        assert_eq!(table.cores_per_unit(12, 0), 256);
        assert_eq!(table.len(), len);
    }

    #[test]
    fn test_register_rejects_wide_minor() {
        let mut table = CoreTable::empty();
        assert!(matches!(table.register(3, 16, 1), Err(DeviceError::CoreTable(_))));
        assert!(matches!(
            table.register(0x1000_0000, 0, 1),
            Err(DeviceError::CoreTable(_))
        ));
    }

    #[test]
    fn test_out_of_range_generation_is_unknown() {
        assert_eq!(generation_code(3, 5), Some(0x35));
        assert_eq!(generation_code(2, 16), None);
        assert_eq!(generation_code(0x0FFF_FFFF, 0x20), None);
        assert_eq!(generation_code(u32::MAX, 0), None);

        // (2, 16) não pode se confundir com (3, 0)
        assert_eq!(cores_per_unit(2, 16), 0);
        assert_eq!(CoreTable::builtin().cores_per_unit(2, 16), 0);
        assert_eq!(cores_per_unit(u32::MAX, u32::MAX), 0);
    }

    #[test]
    fn test_merge_json() {
        let mut table = CoreTable::builtin();
        let json = r#"{"generations":[
            {"major":10,"minor":0,"cores":128},
            {"major":2,"minor":0,"cores":16}
        ]}"#;
        let read = table.merge_json_str(json).unwrap();

        assert_eq!(read, 2);
        assert_eq!(table.cores_per_unit(10, 0), 128);
        assert_eq!(table.cores_per_unit(2, 0), 16);
        assert_eq!(table.cores_per_unit(3, 5), 192);
    }

    #[test]
    fn test_json_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cores.json");
        let table = CoreTable::empty().with_generation(11, 0, 96).unwrap();
        std::fs::write(&path, table.to_json().unwrap()).unwrap();

        let loaded = CoreTable::from_file(&path).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(CoreTable::from_json_str("{not json"), Err(DeviceError::Parse(_))));
    }
}
