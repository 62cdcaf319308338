use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

/// Raised when a payable string cannot be encoded or rasterized.
#[derive(Debug, Error)]
#[error("could not generate a QR code: {0}")]
pub struct QrError(pub String);

/// A payable string plus the pixel size to render it at.
///
/// Rendering is deterministic and pure; the image has no lifecycle beyond
/// the request that asked for it.
#[derive(Clone, Debug)]
pub struct QrImage {
    /// Minimum width and height of the output in pixels.
    pub size: u32,
    pub content: String,
}

impl QrImage {
    /// Encode the content at medium error correction and rasterize to PNG.
    pub fn render(&self) -> Result<Vec<u8>, QrError> {
        let code = QrCode::with_error_correction_level(self.content.as_bytes(), EcLevel::M)
            .map_err(|e| QrError(e.to_string()))?;
        let image = code
            .render::<Luma<u8>>()
            .min_dimensions(self.size, self.size)
            .build();

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| QrError(e.to_string()))?;
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

    #[test]
    fn test_render_produces_png() {
        let qr = QrImage {
            size: 256,
            content: "lnbc10u1p3unwfusp5t9r3yymhpfqculxfwlt".to_string(),
        };
        let png = qr.render().unwrap();
        assert_eq!(&png[..4], &PNG_MAGIC);
    }

    #[test]
    fn test_render_is_deterministic() {
        let qr = QrImage {
            size: 64,
            content: "lnbc1exampleexample".to_string(),
        };
        assert_eq!(qr.render().unwrap(), qr.render().unwrap());
    }

    #[test]
    fn test_oversized_content_is_rejected() {
        // Version 40 tops out below 3 KB; this cannot fit in any QR code.
        let qr = QrImage {
            size: 256,
            content: "x".repeat(4096),
        };
        let err = qr.render().unwrap_err();
        assert!(err.to_string().starts_with("could not generate a QR code"));
    }
}
