//! The two output variants: a plain symbol and the themed wallpaper.

use emergency_record::{EmergencyRecord, serialize};
use image::{Rgba, RgbaImage};
use rand::Rng;
use symbol_engine::{ErrorCorrection, SymbolEncoder};
use tracing::info;

use crate::RenderError;
use crate::compose::{Scene, compose};
use crate::config::CompositionConfig;
use crate::text::FontFace;

/// Encode the record as an undecorated symbol at its native size.
pub fn render_plain<E: SymbolEncoder + ?Sized>(
    record: &EmergencyRecord,
    encoder: &E,
    config: &CompositionConfig,
) -> Result<RgbaImage, RenderError> {
    let payload = serialize(record)?;
    let symbol = encoder.encode(
        &payload,
        config.plain_error_correction,
        config.plain_symbol_colors(),
    )?;
    info!(
        bytes = payload.len(),
        side = symbol.width(),
        "Rendered plain symbol"
    );
    Ok(symbol)
}

/// Encode the record at high error correction and compose the wallpaper.
///
/// The contact banner is always painted; the services banner only when the
/// record carries a dial number. `caption` is wrapped along the bottom.
pub fn render_themed<E, R>(
    record: &EmergencyRecord,
    encoder: &E,
    config: &CompositionConfig,
    font: &FontFace,
    caption: Option<&str>,
    rng: &mut R,
) -> Result<RgbaImage, RenderError>
where
    E: SymbolEncoder + ?Sized,
    R: Rng + ?Sized,
{
    let payload = serialize(record)?;
    let symbol = encoder.encode(
        &payload,
        ErrorCorrection::High,
        config.themed_symbol_colors(),
    )?;

    let (width, height) = (config.layout.canvas_width, config.layout.canvas_height);

    let mut banners = vec![
        config
            .contact_banner
            .banner(height, &record.emergency_contact_phone),
    ];
    if let Some(number) = record.dial_number() {
        banners.push(config.services_banner.banner(height, number));
    }

    let mut headings = vec![config.heading.heading(&config.heading_text, width, height)];
    if let Some(text) = caption.map(str::trim).filter(|t| !t.is_empty()) {
        headings.push(config.caption.heading(text, width, height));
    }

    let scene = Scene {
        layout: &config.layout,
        background: Rgba(config.background),
        decorations: config.decorations.as_ref(),
        banners: &banners,
        headings: &headings,
    };
    let canvas = compose(&symbol, &scene, font, rng)?;
    info!(
        bytes = payload.len(),
        width,
        height,
        banners = banners.len(),
        "Rendered themed wallpaper"
    );
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComposeError;
    use emergency_record::{RecordError, RequiredField};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use symbol_engine::{QrEncoder, SymbolError};

    fn record() -> EmergencyRecord {
        EmergencyRecord {
            name: "Jane Doe".into(),
            blood_group: "O+".into(),
            allergies: "Penicillin, peanuts".into(),
            emergency_contact_name: "John Doe".into(),
            emergency_contact_phone: "555-0100".into(),
            emergency_contact_relation: "Brother".into(),
            ..Default::default()
        }
    }

    #[test]
    fn plain_symbol_is_black_and_white() {
        let image = render_plain(&record(), &QrEncoder::default(), &CompositionConfig::default())
            .unwrap();
        assert_eq!(image.width(), image.height());
        for pixel in image.pixels() {
            assert!(
                *pixel == Rgba([0, 0, 0, 255]) || *pixel == Rgba([255, 255, 255, 255]),
                "{pixel:?}"
            );
        }
    }

    #[test]
    fn missing_field_produces_no_image() {
        let mut incomplete = record();
        incomplete.blood_group.clear();

        let err = render_plain(&incomplete, &QrEncoder::default(), &CompositionConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Record(RecordError::MissingField(RequiredField::BloodGroup))
        ));

        let err = render_themed(
            &incomplete,
            &QrEncoder::default(),
            &CompositionConfig::default(),
            &FontFace::Builtin,
            None,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Record(RecordError::MissingField(_))));
    }

    #[test]
    fn themed_wallpaper_has_configured_size() {
        let config = CompositionConfig::default();
        let image = render_themed(
            &record(),
            &QrEncoder::default(),
            &config,
            &FontFace::Builtin,
            Some("This QR code contains vital medical information for emergency use."),
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        assert_eq!(image.dimensions(), (1080, 1920));

        // Quiet zone of the navy symbol starts at the top-left of its bounds.
        assert_eq!(*image.get_pixel(270, 210), Rgba([249, 245, 231, 255]));
        // Contact banner band is tinted pink over the cream background.
        let band = *image.get_pixel(5, 1020);
        assert!(band[1] < 245, "{band:?}");
    }

    #[test]
    fn services_banner_only_with_dial_number() {
        let config = CompositionConfig {
            decorations: None,
            ..Default::default()
        };
        let render = |record: &EmergencyRecord| {
            render_themed(
                record,
                &QrEncoder::default(),
                &config,
                &FontFace::Builtin,
                None,
                &mut StdRng::seed_from_u64(0),
            )
            .unwrap()
        };

        let without = render(&record());
        let with = render(&EmergencyRecord {
            emergency_dial_number: Some("112".into()),
            ..record()
        });

        // Services band sits at 80% of the height; near its left edge no
        // text is drawn, so the pixel is background or band.
        assert_eq!(*without.get_pixel(5, 1580), Rgba([249, 245, 231, 255]));
        assert_ne!(*with.get_pixel(5, 1580), Rgba([249, 245, 231, 255]));
    }

    #[test]
    fn oversized_payload_exceeds_capacity() {
        let huge = EmergencyRecord {
            additional_info: "x".repeat(4000),
            ..record()
        };
        let err = render_themed(
            &huge,
            &QrEncoder::default(),
            &CompositionConfig::default(),
            &FontFace::Builtin,
            None,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Symbol(SymbolError::CapacityExceeded {
                level: ErrorCorrection::High,
                ..
            })
        ));
    }

    #[test]
    fn invalid_layout_is_reported() {
        let mut config = CompositionConfig::default();
        config.layout.symbol_fraction_of_width = 0.0;
        let err = render_themed(
            &record(),
            &QrEncoder::default(),
            &config,
            &FontFace::Builtin,
            None,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Compose(ComposeError::InvalidLayout(_))));
    }
}
