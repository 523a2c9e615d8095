//! Object catalogs: the built-in heritage set and JSON catalog files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use heritage_map_core::{ArchaeologicalObject, GeoCoord, ObjectId};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Errors raised while loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CatalogError {
    /// The catalog file could not be read.
    #[error("could not read catalog {}: {source}", path.display())]
    Io {
        /// Location of the catalog file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The catalog was not a JSON array of objects.
    #[error("could not parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// An object had a blank region name.
    #[error("object '{id}' has no region name")]
    MissingRegion {
        /// Offending object.
        id: ObjectId,
    },
    /// An object awarded no points.
    #[error("object '{id}' must award at least one point")]
    ZeroPoints {
        /// Offending object.
        id: ObjectId,
    },
    /// An object had NaN or infinite coordinates.
    #[error("object '{id}' has non-finite coordinates")]
    InvalidCoordinates {
        /// Offending object.
        id: ObjectId,
    },
}

/// Reads and validates a JSON catalog file.
pub(crate) fn load(path: &Path) -> Result<Vec<ArchaeologicalObject>, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_owned(),
        source,
    })?;
    from_json(&text)
}

/// Parses and validates a JSON array of objects.
pub(crate) fn from_json(text: &str) -> Result<Vec<ArchaeologicalObject>, CatalogError> {
    let objects: Vec<ArchaeologicalObject> = serde_json::from_str(text)?;
    for object in &objects {
        validate(object)?;
    }
    Ok(objects)
}

fn validate(object: &ArchaeologicalObject) -> Result<(), CatalogError> {
    if object.region.trim().is_empty() {
        return Err(CatalogError::MissingRegion {
            id: object.id.clone(),
        });
    }
    if object.points == 0 {
        return Err(CatalogError::ZeroPoints {
            id: object.id.clone(),
        });
    }
    if !object.coordinates.is_finite() {
        return Err(CatalogError::InvalidCoordinates {
            id: object.id.clone(),
        });
    }
    Ok(())
}

/// Reorders the catalog deterministically for the given seed.
pub(crate) fn shuffle(catalog: &mut [ArchaeologicalObject], seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    catalog.shuffle(&mut rng);
}

/// Heritage sites shipped with the game.
pub(crate) fn builtin() -> Vec<ArchaeologicalObject> {
    vec![
        ArchaeologicalObject::new(
            "khoja-ahmed-yasawi",
            "Mausoleum of Khoja Ahmed Yasawi",
            "Туркестанская область",
            GeoCoord::new(68.2736, 43.2931),
            20,
        )
        .with_period("XIV century")
        .with_description("Timurid-era shrine and UNESCO World Heritage Site in Turkistan."),
        ArchaeologicalObject::new(
            "otrar",
            "Otrar settlement",
            "Туркестанская область",
            GeoCoord::new(68.303, 42.852),
            15,
        )
        .with_period("I-XVIII centuries"),
        ArchaeologicalObject::new(
            "tamgaly",
            "Tamgaly petroglyphs",
            "Алматинская область",
            GeoCoord::new(75.5289, 43.8039),
            20,
        )
        .with_period("Bronze Age")
        .with_description("Thousands of rock carvings in the Chu-Ili mountains."),
        ArchaeologicalObject::new(
            "issyk-kurgan",
            "Issyk kurgan",
            "Алматинская область",
            GeoCoord::new(77.45, 43.37),
            25,
        )
        .with_period("V-IV centuries BC")
        .with_description("Saka burial mound where the Golden Man was found."),
        ArchaeologicalObject::new(
            "aisha-bibi",
            "Aisha Bibi mausoleum",
            "Жамбылская область",
            GeoCoord::new(71.21, 42.853),
            15,
        )
        .with_period("XI-XII centuries"),
        ArchaeologicalObject::new(
            "botai",
            "Botai settlement",
            "Северо-Казахстанская область",
            GeoCoord::new(67.36, 53.13),
            20,
        )
        .with_period("Eneolithic")
        .with_description("Early evidence of horse domestication."),
        ArchaeologicalObject::new(
            "berel",
            "Berel kurgans",
            "Восточно-Казахстанская область",
            GeoCoord::new(86.39, 49.37),
            25,
        )
        .with_period("IV-III centuries BC"),
        ArchaeologicalObject::new(
            "begazy",
            "Begazy necropolis",
            "Карагандинская область",
            GeoCoord::new(74.75, 47.95),
            15,
        )
        .with_period("Late Bronze Age"),
        ArchaeologicalObject::new(
            "saraishyk",
            "Saraishyk settlement",
            "Атырауская область",
            GeoCoord::new(51.97, 47.48),
            15,
        )
        .with_period("X-XVI centuries"),
        ArchaeologicalObject::new(
            "beket-ata",
            "Beket-Ata underground mosque",
            "Мангистауская область",
            GeoCoord::new(54.47, 43.6),
            10,
        )
        .with_period("XVIII century"),
        ArchaeologicalObject::new(
            "jochi-khan",
            "Mausoleum of Jochi Khan",
            "Улытауская область",
            GeoCoord::new(67.7, 47.83),
            20,
        )
        .with_period("XIII century"),
    ]
}

#[cfg(test)]
mod tests {
    use super::{builtin, from_json, shuffle, CatalogError};
    use heritage_map_core::RegionId;
    use heritage_map_system_classifier::classify;

    #[test]
    fn builtin_catalog_passes_validation() {
        let json = serde_json::to_string(&builtin()).expect("serialize");
        let parsed = from_json(&json).expect("valid catalog");
        assert_eq!(parsed, builtin());
    }

    #[test]
    fn builtin_catalog_covers_every_region() {
        let catalog = builtin();
        for region in RegionId::ALL {
            assert!(
                catalog.iter().any(|object| classify(&object.region) == region),
                "no built-in object in {region}"
            );
        }
    }

    #[test]
    fn catalog_json_uses_coordinate_pairs() {
        let catalog = from_json(
            r#"[{"id":"otrar","name":"Otrar","region":"Туркестанская область",
                "coordinates":[68.3,42.85],"points":15}]"#,
        )
        .expect("valid catalog");
        assert_eq!(catalog.len(), 1);
        assert!((catalog[0].coordinates.longitude() - 68.3).abs() < f64::EPSILON);
        assert_eq!(catalog[0].period, None);
    }

    #[test]
    fn zero_point_objects_are_rejected() {
        let error = from_json(
            r#"[{"id":"otrar","name":"Otrar","region":"Туркестанская область",
                "coordinates":[68.3,42.85],"points":0}]"#,
        )
        .expect_err("zero points");
        assert!(matches!(error, CatalogError::ZeroPoints { .. }));
    }

    #[test]
    fn blank_regions_are_rejected() {
        let error = from_json(
            r#"[{"id":"otrar","name":"Otrar","region":"  ",
                "coordinates":[68.3,42.85],"points":5}]"#,
        )
        .expect_err("blank region");
        assert_eq!(error.to_string(), "object 'otrar' has no region name");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            from_json("{\"id\": 1}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn shuffle_is_deterministic_per_seed() {
        let mut first = builtin();
        let mut second = builtin();
        shuffle(&mut first, 7);
        shuffle(&mut second, 7);
        assert_eq!(first, second);

        let mut ids: Vec<String> = first.iter().map(|object| object.id.to_string()).collect();
        let mut original: Vec<String> =
            builtin().iter().map(|object| object.id.to_string()).collect();
        ids.sort();
        original.sort();
        assert_eq!(ids, original);
    }
}
