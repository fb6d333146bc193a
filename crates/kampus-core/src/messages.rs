//! User-facing messages
//!
//! Upload outcomes are shown verbatim to end users (flash notices, JSON `message`
//! fields), so every message exists in each supported UI language.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Tr,
    En,
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tr" | "tr-tr" | "turkish" => Ok(Locale::Tr),
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::En),
            _ => Err(anyhow::anyhow!("Unsupported message locale: {}", s)),
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Locale::Tr => write!(f, "tr"),
            Locale::En => write!(f, "en"),
        }
    }
}

/// A user-facing upload message, rendered per locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<'a> {
    NoFileSelected,
    UnsupportedType { filename: &'a str },
    TooLarge { max_mb: u64 },
    UnsafeExtension { extension: &'a str },
    UnsafeMimeType { mime_type: &'a str },
    InvalidCategory,
    Uploaded,
    Deleted,
    NotFound,
    SaveFailed { reason: &'a str },
    DeleteFailed { reason: &'a str },
    InvalidPath,
}

impl Message<'_> {
    pub fn render(&self, locale: Locale) -> String {
        match locale {
            Locale::Tr => self.render_tr(),
            Locale::En => self.render_en(),
        }
    }

    fn render_tr(&self) -> String {
        match self {
            Message::NoFileSelected => "Dosya seçilmedi".to_string(),
            Message::UnsupportedType { filename } => {
                format!("Desteklenmeyen dosya türü: {}", filename)
            }
            Message::TooLarge { max_mb } => {
                format!("Dosya boyutu çok büyük. Maksimum: {}MB", max_mb)
            }
            Message::UnsafeExtension { extension } => {
                format!("Güvenli olmayan dosya uzantısı: .{}", extension)
            }
            Message::UnsafeMimeType { mime_type } => {
                format!("Güvenli olmayan dosya türü: {}", mime_type)
            }
            Message::InvalidCategory => "Geçersiz dosya türü".to_string(),
            Message::Uploaded => "Dosya başarıyla yüklendi".to_string(),
            Message::Deleted => "Dosya başarıyla silindi".to_string(),
            Message::NotFound => "Dosya bulunamadı".to_string(),
            Message::SaveFailed { reason } => format!("Dosya kaydetme hatası: {}", reason),
            Message::DeleteFailed { reason } => format!("Dosya silme hatası: {}", reason),
            Message::InvalidPath => "Geçersiz dosya yolu".to_string(),
        }
    }

    fn render_en(&self) -> String {
        match self {
            Message::NoFileSelected => "No file selected".to_string(),
            Message::UnsupportedType { filename } => {
                format!("Unsupported file type: {}", filename)
            }
            Message::TooLarge { max_mb } => {
                format!("File is too large. Maximum: {}MB", max_mb)
            }
            Message::UnsafeExtension { extension } => {
                format!("Unsafe file extension: .{}", extension)
            }
            Message::UnsafeMimeType { mime_type } => format!("Unsafe file type: {}", mime_type),
            Message::InvalidCategory => "Invalid file type".to_string(),
            Message::Uploaded => "File uploaded successfully".to_string(),
            Message::Deleted => "File deleted successfully".to_string(),
            Message::NotFound => "File not found".to_string(),
            Message::SaveFailed { reason } => format!("File save error: {}", reason),
            Message::DeleteFailed { reason } => format!("File delete error: {}", reason),
            Message::InvalidPath => "Invalid file path".to_string(),
        }
    }
}
