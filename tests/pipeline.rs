//! End-to-end behaviour of the sprite to placement pipeline.

use std::collections::BTreeSet;

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use insta::assert_debug_snapshot;
use pretty_assertions::assert_eq;

use pxbase::mapping::BASE_FLAG_ID;
use pxbase::{
    build_transparency_mask, sprite_data_to_objects, sprite_to_image, BaseError, ColorResolver,
    ColorTable, Colour, CoordinateMapper, DitherMethod, Palette, PixelKey, PlacementOptions,
    PlacementRecord, Quantizer, SaveDocument, Sprite, TransparencyMask,
};

fn anchor() -> PlacementRecord {
    PlacementRecord {
        type_id: BASE_FLAG_ID.to_string(),
        position: [-120.5, 64.0, 310.25],
        ..Default::default()
    }
}

fn run(
    sprite: &Sprite,
    table: &ColorTable,
    mask: Option<&TransparencyMask>,
) -> pxbase::Result<Vec<PlacementRecord>> {
    sprite_data_to_objects(
        sprite,
        &anchor(),
        &ColorResolver::new(table),
        &PlacementOptions::default(),
        mask,
    )
}

fn noisy_image(width: u32, height: u32, seed: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let v = (x * 37 + y * 101 + seed * 13) % 256;
        Rgba([v as u8, (v * 7 % 256) as u8, (255 - v) as u8, 255])
    })
}

#[test]
fn distinct_indices_map_row_major() {
    let sprite = Sprite::from_indices(8, 8, (0..64).collect()).unwrap();
    let table = ColorTable::nes_default();

    let records = run(&sprite, &table, None).unwrap();
    assert_eq!(records.len(), 64);

    let mapper = CoordinateMapper::default();
    for (i, record) in records.iter().enumerate() {
        let kind = table
            .get(&PixelKey::Index(i as u8))
            .flatten()
            .expect("every NES index is mapped");
        let (column, row) = ((i % 8) as u32, (i / 8) as u32);

        assert_eq!(record.type_id, kind.object);
        assert_eq!(record.modifier, kind.modifier);
        assert_eq!(record.position, mapper.map(column, row, anchor().position));
    }
}

#[test]
fn quantized_sprite_with_uniform_table() {
    let img = noisy_image(16, 16, 1);
    let sprite = Quantizer::new(Palette::nes()).quantize(&img).unwrap();
    let table = ColorTable::uniform("floor", 64, "^S_FLOOR", 7).unwrap();

    let records = run(&sprite, &table, None).unwrap();
    assert_eq!(records.len(), 256);
    assert!(records.iter().all(|r| r.type_id == "^S_FLOOR" && r.modifier == 7));

    let origin = anchor().position;
    assert_eq!(records[0].position, origin);
    assert_eq!(records[17].position, [origin[0] + 5.0, origin[1], origin[2] + 5.0]);
    assert_eq!(records[255].position, [origin[0] + 75.0, origin[1], origin[2] + 75.0]);
}

#[test]
fn unmapped_key_fails_without_output() {
    let sprite = Sprite::from_indices(3, 1, vec![0, 1, 9]).unwrap();
    let table = ColorTable::uniform("short", 4, "^S_FLOOR", 0).unwrap();

    let err = run(&sprite, &table, None).unwrap_err();
    match err {
        BaseError::UnmappedColor { key, column, row } => {
            assert_eq!(key, PixelKey::Index(9));
            assert_eq!((column, row), (2, 0));
        }
        other => panic!("expected UnmappedColor, got {:?}", other),
    }
}

#[test]
fn mask_never_adds_records() {
    let mut img = noisy_image(10, 6, 2);
    for x in 0..10 {
        img.put_pixel(x, 3, Rgba([0, 0, 0, 0]));
    }
    let dynamic = DynamicImage::ImageRgba8(img.clone());

    let mask = build_transparency_mask(&dynamic).unwrap();
    assert_eq!(mask.len(), 60);
    assert_eq!(mask.transparent_count(), 10);

    let sprite = Quantizer::new(Palette::nes()).quantize(&img).unwrap();
    let table = ColorTable::uniform("floor", 64, "^S_FLOOR", 0).unwrap();

    let masked = run(&sprite, &table, Some(&mask)).unwrap();
    let unmasked = run(&sprite, &table, Some(&TransparencyMask::opaque(60))).unwrap();

    assert_eq!(masked.len(), 50);
    assert_eq!(unmasked.len(), 60);
    assert!(masked.iter().all(|r| r.position[2] != anchor().position[2] + 15.0));
}

#[test]
fn mask_requires_alpha_channel() {
    let rgb = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])));
    let err = build_transparency_mask(&rgb).unwrap_err();
    assert!(matches!(err, BaseError::InvalidPixelFormat { .. }));
}

#[test]
fn quantized_images_share_palette_colours() {
    // The same colours in reverse order, read back from a palette sheet.
    let nes = Palette::nes();
    let colours = nes.colours();
    let sheet = RgbaImage::from_fn(8, 8, |x, y| Rgba::from(colours[63 - (y * 8 + x) as usize]));
    let reordered = Palette::from_image("sheet", &sheet).unwrap();
    assert_ne!(reordered.colours(), nes.colours());

    let first = Quantizer::new(nes.clone());
    let second = Quantizer::new(reordered).with_dither(DitherMethod::FloydSteinberg);

    let a = first.quantize(&noisy_image(12, 12, 3)).unwrap();
    let b = second.quantize(&noisy_image(9, 14, 4)).unwrap();

    let used = |sprite: &Sprite, palette: &Palette| -> BTreeSet<Colour> {
        sprite_to_image(sprite, palette, None)
            .unwrap()
            .pixels()
            .map(|p| Colour::from(*p))
            .collect()
    };
    let used_a = used(&a, first.palette());
    let used_b = used(&b, second.palette());

    assert_eq!(first.palette().colour_set(), second.palette().colour_set());
    assert!(used_a.len() > 1 && used_b.len() > 1);
    assert!(used_a.is_subset(&nes.colour_set()));
    assert!(used_b.is_subset(&nes.colour_set()));
}

#[test]
fn background_entries_place_nothing() {
    let img = RgbaImage::from_fn(3, 1, |x, _| match x {
        0 => Rgba([146, 144, 255, 255]),
        1 => Rgba([252, 252, 252, 255]),
        _ => Rgba([116, 116, 116, 255]),
    });
    let sprite = Sprite::from_rgba(&img).unwrap();

    let records = run(&sprite, &ColorTable::sprite_colours(), None).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].type_id, "^BUILDPAVING_BIG");
}

#[test]
fn record_summary() {
    let sprite = Sprite::from_indices(2, 1, vec![0x00, 0x30]).unwrap();
    let records = run(&sprite, &ColorTable::nes_default(), None).unwrap();

    let summary: Vec<(String, u64)> = records
        .into_iter()
        .map(|r| (r.type_id, r.modifier))
        .collect();

    assert_debug_snapshot!(summary, @r###"
    [
        (
            "^CUBE_SOLID",
            15,
        ),
        (
            "^F_FLOOR",
            0,
        ),
    ]
    "###);
}

#[test]
fn document_round_trip() {
    let mut doc = SaveDocument::parse(
        r#"{"Name": "Plaza", "Objects": [{"ObjectID": "^BASE_FLAG", "Position": [1.0, 2.0, 3.0]}]}"#,
    )
    .unwrap();
    let anchor = doc.anchor(BASE_FLAG_ID).unwrap();

    let sprite = Sprite::from_indices(2, 2, vec![0x11; 4]).unwrap();
    let records = sprite_data_to_objects(
        &sprite,
        &anchor,
        &ColorResolver::new(&ColorTable::nes_default()),
        &PlacementOptions {
            vertical_lift: 2.0,
            ..Default::default()
        },
        None,
    )
    .unwrap();
    doc.append(&records).unwrap();

    let text = doc.to_string_pretty().unwrap();
    assert!(text.contains("\n    \"Objects\": ["));

    let reloaded = SaveDocument::parse(&text).unwrap();
    let objects = reloaded.objects().unwrap();
    assert_eq!(objects.len(), 5);

    let last = PlacementRecord::from_json(&objects[4]).unwrap();
    assert_eq!(last.position, [6.0, 4.0, 8.0]);
    assert_eq!(last.up, None);
    assert!(objects[4].get("Timestamp").is_none());
}
