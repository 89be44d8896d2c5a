// src/models/de.rs
//! Deserializadores auxiliares para os corpos JSON e query strings.
use serde::{de, Deserialize, Deserializer};
use std::{fmt::Display, str::FromStr};

/// Remove espaços nas pontas antes de validar o tamanho.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.trim().to_string())
}

/// `null`, ausente ou `""` viram `None` (o formulário envia email vazio).
pub fn opcional_trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
}

/// Para query params: `?turma_id=` conta como filtro ausente.
pub fn vazio_como_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}
