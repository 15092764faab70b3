//! Barcode and QR code symbols.
//!
//! Symbols are produced as plain module data that the engine paints as vector cells, so no
//! raster image is ever embedded.
//!
//! Linear symbols come from `barcoders` (Code 128, Code 39, Code 93, EAN-13, EAN-8,
//! UPC-A, Interleaved 2 of 5, Codabar) and QR codes from `qrcode`. Both generators sit
//! behind the `barcodes` feature. Without it, [`ModuleMatrix::new`] and
//! [`BarPattern::new`] still accept module data produced elsewhere.

use crate::error::{Error, Result};

/// Quiet zone added around generated QR codes, in modules.
pub const QR_QUIET_ZONE: usize = 4;

/// Linear symbologies [`BarPattern::encode`] understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeType {
    /// Character set B unless the data starts with a set selector
    Code128,
    Code39,
    /// 12 digits plus check digit
    Ean13,
    /// 7 digits plus check digit
    Ean8,
    /// 11 digits plus check digit
    UpcA,
    /// Interleaved 2 of 5
    Itf,
    Code93,
    Codabar,
}

impl BarcodeType {
    /// Human-readable symbology name.
    pub fn name(self) -> &'static str {
        match self {
            BarcodeType::Code128 => "Code 128",
            BarcodeType::Code39 => "Code 39",
            BarcodeType::Ean13 => "EAN-13",
            BarcodeType::Ean8 => "EAN-8",
            BarcodeType::UpcA => "UPC-A",
            BarcodeType::Itf => "ITF",
            BarcodeType::Code93 => "Code 93",
            BarcodeType::Codabar => "Codabar",
        }
    }
}

impl std::fmt::Display for BarcodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// QR error correction level, by share of codewords that may be lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrErrorCorrection {
    /// about 7%
    Low,
    /// about 15%
    #[default]
    Medium,
    /// about 25%
    Quartile,
    /// about 30%
    High,
}

/// Square grid of dark (`true`) and light modules of a 2D code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: usize,
    cells: Vec<bool>,
}

impl ModuleMatrix {
    /// Build from rows. Every row must be as long as there are rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_scribe::writer::ModuleMatrix;
    ///
    /// let m = ModuleMatrix::new(vec![vec![true, false], vec![false, true]]).unwrap();
    /// assert_eq!(m.size(), 2);
    /// assert!(m.get(1, 1));
    /// assert!(ModuleMatrix::new(vec![vec![true]; 2]).is_err());
    /// ```
    pub fn new(rows: Vec<Vec<bool>>) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(Error::config("module matrix must not be empty"));
        }
        if let Some(bad) = rows.iter().position(|row| row.len() != size) {
            return Err(Error::config(format!(
                "module matrix must be square: row {} has {} modules, expected {}",
                bad,
                rows[bad].len(),
                size
            )));
        }
        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Modules per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Module at `row`, `col`; out of range reads as light.
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row * self.size + col]
    }

    /// Number of fully light rings around the outside.
    pub fn blank_rings(&self) -> usize {
        let mut rings = 0;
        while rings * 2 < self.size && self.ring_is_blank(rings) {
            rings += 1;
        }
        rings
    }

    fn ring_is_blank(&self, ring: usize) -> bool {
        let last = self.size - 1 - ring;
        (ring..=last).all(|i| {
            !self.get(ring, i) && !self.get(last, i) && !self.get(i, ring) && !self.get(i, last)
        })
    }

    /// Encode `text` as a QR code with a [`QR_QUIET_ZONE`] border.
    #[cfg(feature = "barcodes")]
    pub fn qr(text: &str, level: QrErrorCorrection) -> Result<Self> {
        use qrcode::{EcLevel, QrCode};

        let ec_level = match level {
            QrErrorCorrection::Low => EcLevel::L,
            QrErrorCorrection::Medium => EcLevel::M,
            QrErrorCorrection::Quartile => EcLevel::Q,
            QrErrorCorrection::High => EcLevel::H,
        };

        let code = QrCode::with_error_correction_level(text, ec_level)
            .map_err(|e| Error::Barcode(format!("QR code encoding error: {}", e)))?;

        let width = code.width();
        let size = width + QR_QUIET_ZONE * 2;
        let mut cells = vec![false; size * size];
        for (y, row) in code.to_colors().chunks(width).enumerate() {
            for (x, &module) in row.iter().enumerate() {
                if module == qrcode::Color::Dark {
                    cells[(y + QR_QUIET_ZONE) * size + x + QR_QUIET_ZONE] = true;
                }
            }
        }
        Ok(Self { size, cells })
    }

    /// QR generation requires the `barcodes` feature.
    #[cfg(not(feature = "barcodes"))]
    pub fn qr(_text: &str, _level: QrErrorCorrection) -> Result<Self> {
        Err(Error::Barcode("QR code generation requires the 'barcodes' feature".to_string()))
    }
}

/// Dark (`true`) and light modules of a 1D symbol, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarPattern {
    modules: Vec<bool>,
}

impl BarPattern {
    /// Wrap a module run. It must contain at least one dark module.
    pub fn new(modules: Vec<bool>) -> Result<Self> {
        if !modules.iter().any(|m| *m) {
            return Err(Error::config("bar pattern has no dark modules"));
        }
        Ok(Self { modules })
    }

    /// Module count.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Never true for a constructed pattern.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module values.
    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    /// Runs of consecutive dark modules as `(start, length)`.
    pub fn bars(&self) -> Vec<(usize, usize)> {
        let mut bars = Vec::new();
        let mut start = None;
        for (i, &dark) in self.modules.iter().enumerate() {
            match (dark, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    bars.push((s, i - s));
                    start = None;
                },
                _ => {},
            }
        }
        if let Some(s) = start {
            bars.push((s, self.modules.len() - s));
        }
        bars
    }

    /// Encode Code 128 in character set B.
    pub fn code128(data: &str) -> Result<Self> {
        Self::encode(BarcodeType::Code128, data)
    }

    /// Encode `data` in the given symbology.
    #[cfg(feature = "barcodes")]
    pub fn encode(barcode_type: BarcodeType, data: &str) -> Result<Self> {
        use barcoders::sym::codabar::Codabar;
        use barcoders::sym::code128::Code128;
        use barcoders::sym::code39::Code39;
        use barcoders::sym::code93::Code93;
        use barcoders::sym::ean13::EAN13;
        use barcoders::sym::ean8::EAN8;
        use barcoders::sym::tf::TF;

        let encoded: Vec<u8> = match barcode_type {
            BarcodeType::Code128 => {
                // \u{00C0} selects set A, \u{0181} set B, \u{0106} set C
                let data_with_prefix = if data.starts_with('\u{00C0}')
                    || data.starts_with('\u{0181}')
                    || data.starts_with('\u{0106}')
                {
                    data.to_string()
                } else {
                    format!("\u{0181}{}", data)
                };
                Code128::new(&data_with_prefix)
                    .map_err(|e| Error::Barcode(format!("Code128 encoding error: {}", e)))?
                    .encode()
            },
            BarcodeType::Code39 => Code39::new(data)
                .map_err(|e| Error::Barcode(format!("Code39 encoding error: {}", e)))?
                .encode(),
            BarcodeType::Ean13 => EAN13::new(data)
                .map_err(|e| Error::Barcode(format!("EAN-13 encoding error: {}", e)))?
                .encode(),
            BarcodeType::Ean8 => EAN8::new(data)
                .map_err(|e| Error::Barcode(format!("EAN-8 encoding error: {}", e)))?
                .encode(),
            BarcodeType::UpcA => {
                // UPC-A is EAN-13 with a leading 0
                let upc_data = match data.len() {
                    11 => format!("0{}", data),
                    12 => format!("0{}", &data[..11]),
                    _ => {
                        return Err(Error::Barcode("UPC-A requires 11 or 12 digits".to_string()))
                    },
                };
                EAN13::new(&upc_data)
                    .map_err(|e| Error::Barcode(format!("UPC-A encoding error: {}", e)))?
                    .encode()
            },
            BarcodeType::Itf => TF::interleaved(data)
                .map_err(|e| Error::Barcode(format!("ITF encoding error: {}", e)))?
                .encode(),
            BarcodeType::Code93 => Code93::new(data)
                .map_err(|e| Error::Barcode(format!("Code93 encoding error: {}", e)))?
                .encode(),
            BarcodeType::Codabar => Codabar::new(data)
                .map_err(|e| Error::Barcode(format!("Codabar encoding error: {}", e)))?
                .encode(),
        };

        Self::new(encoded.into_iter().map(|m| m == 1).collect())
            .map_err(|_| Error::Barcode(format!("{} produced no bars", barcode_type)))
    }

    /// Barcode generation requires the `barcodes` feature.
    #[cfg(not(feature = "barcodes"))]
    pub fn encode(_barcode_type: BarcodeType, _data: &str) -> Result<Self> {
        Err(Error::Barcode("Barcode generation requires the 'barcodes' feature".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(size: usize, ring: usize) -> ModuleMatrix {
        let rows = (0..size)
            .map(|r| {
                (0..size)
                    .map(|c| r >= ring && c >= ring && r < size - ring && c < size - ring)
                    .collect()
            })
            .collect();
        ModuleMatrix::new(rows).unwrap()
    }

    #[test]
    fn test_blank_rings() {
        assert_eq!(framed(10, 0).blank_rings(), 0);
        assert_eq!(framed(10, 3).blank_rings(), 3);
    }

    #[test]
    fn test_blank_rings_all_light() {
        let m = ModuleMatrix::new(vec![vec![false; 5]; 5]).unwrap();
        assert_eq!(m.blank_rings(), 3);
    }

    #[test]
    fn test_matrix_rejects_ragged_rows() {
        let err = ModuleMatrix::new(vec![vec![true, true], vec![true]]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(ModuleMatrix::new(Vec::new()).is_err());
    }

    #[test]
    fn test_get_out_of_range() {
        let m = framed(3, 0);
        assert!(m.get(2, 2));
        assert!(!m.get(3, 0));
    }

    #[test]
    fn test_bar_runs() {
        let p = BarPattern::new(vec![true, true, false, true, false, false, true]).unwrap();
        assert_eq!(p.bars(), vec![(0, 2), (3, 1), (6, 1)]);
        assert_eq!(p.len(), 7);
    }

    #[test]
    fn test_bar_pattern_needs_dark_module() {
        assert!(BarPattern::new(vec![false; 4]).is_err());
        assert!(BarPattern::new(Vec::new()).is_err());
    }

    #[test]
    fn test_barcode_type_display() {
        assert_eq!(BarcodeType::Code128.to_string(), "Code 128");
        assert_eq!(BarcodeType::Ean13.to_string(), "EAN-13");
    }

    #[cfg(feature = "barcodes")]
    #[test]
    fn test_qr_has_quiet_zone() {
        let m = ModuleMatrix::qr("https://example.com", QrErrorCorrection::Medium).unwrap();
        assert_eq!(m.blank_rings(), QR_QUIET_ZONE);
        // version 2 or above for this payload
        assert!(m.size() >= 25 + QR_QUIET_ZONE * 2);
    }

    #[cfg(feature = "barcodes")]
    #[test]
    fn test_code128_starts_and_ends_dark() {
        let p = BarPattern::code128("ABC123").unwrap();
        assert!(p.modules()[0]);
        assert!(*p.modules().last().unwrap());
    }

    #[cfg(feature = "barcodes")]
    #[test]
    fn test_ean13() {
        let p = BarPattern::encode(BarcodeType::Ean13, "5901234123457").unwrap();
        assert_eq!(p.len(), 95);
    }

    #[cfg(not(feature = "barcodes"))]
    #[test]
    fn test_feature_not_enabled() {
        let result = BarPattern::code128("test");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("requires the 'barcodes' feature"));
    }
}
