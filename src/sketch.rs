//! Data handed to a profile-sketch renderer: one column per profile with
//! ordered horizons, labels and resolved colours. Nothing here draws.

use std::collections::{BTreeMap, BTreeSet};

use palette::{Hsl, IntoColor, Srgb};

use crate::collection::ProfileCollection;
use crate::data::interval::DepthInterval;
use crate::data::value::Value;
use crate::error::{Error, Result};

/// 8-bit sRGB colour.
pub type Rgb8 = Srgb<u8>;

fn gray() -> Rgb8 {
    Srgb::new(128, 128, 128)
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb8> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}

/// Parse `#rrggbb` / `#rgb` hex or a CSS colour name such as `sandybrown`.
pub fn parse_color(s: &str) -> Option<Rgb8> {
    let s = s.trim();
    if s.starts_with('#') {
        return s.parse::<Rgb8>().ok();
    }
    palette::named::from_str(&s.to_ascii_lowercase())
}

// ---------------------------------------------------------------------------
// Color mapping: attribute value → colour
// ---------------------------------------------------------------------------

/// Maps unique values of a chosen column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<Value, Rgb8>,
    default_color: Rgb8,
}

impl ColorMap {
    pub fn new(column: &str, unique_values: &BTreeSet<Value>) -> Self {
        let values: Vec<&Value> = unique_values.iter().filter(|v| !v.is_null()).collect();
        let mapping = values
            .iter()
            .zip(generate_palette(values.len()))
            .map(|(v, c)| ((*v).clone(), c))
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: gray(),
        }
    }

    pub fn color_for(&self, value: &Value) -> Rgb8 {
        self.mapping.get(value).copied().unwrap_or(self.default_color)
    }

    /// Legend entries (value label → colour).
    pub fn legend_entries(&self) -> Vec<(String, Rgb8)> {
        self.mapping.iter().map(|(v, c)| (v.to_string(), *c)).collect()
    }
}

// ---------------------------------------------------------------------------
// Sketch contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpec {
    /// Colour from a horizon attribute: literal colours when every value
    /// parses as one, otherwise a generated palette over its unique values.
    Column(String),
    /// One colour for every horizon.
    Fixed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchOptions {
    pub color: ColorSpec,
    /// Label column; defaults to the designation column.
    pub label: Option<String>,
    /// Extra attributes copied onto every sketch horizon.
    pub attributes: Vec<String>,
}

impl SketchOptions {
    pub fn new(color: ColorSpec) -> Self {
        SketchOptions {
            color,
            label: None,
            attributes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SketchHorizon {
    pub interval: DepthInterval,
    pub label: Option<String>,
    pub color: Rgb8,
    pub values: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SketchColumn {
    pub profile_id: Value,
    pub horizons: Vec<SketchHorizon>,
}

enum Coloring {
    Literal(String),
    Mapped(ColorMap),
    Fixed(Rgb8),
}

impl ProfileCollection {
    /// One sketch column per profile, in collection order.
    pub fn sketch(&self, options: &SketchOptions) -> Result<Vec<SketchColumn>> {
        let table = self.horizons();
        let require = |name: &str| {
            if table.has_attribute(name) {
                Ok(())
            } else {
                Err(Error::schema(format!("no horizon attribute '{name}' to sketch")))
            }
        };

        let coloring = match &options.color {
            ColorSpec::Fixed(name) => Coloring::Fixed(
                parse_color(name).ok_or_else(|| Error::config(format!("unknown colour '{name}'")))?,
            ),
            ColorSpec::Column(column) => {
                require(column.as_str())?;
                let literal = table.iter().map(|h| h.attribute(column)).all(|v| {
                    v.is_null() || v.as_str().and_then(parse_color).is_some()
                });
                if literal {
                    Coloring::Literal(column.clone())
                } else {
                    let unique: BTreeSet<Value> =
                        table.iter().map(|h| h.attribute(column).clone()).collect();
                    Coloring::Mapped(ColorMap::new(column, &unique))
                }
            }
        };

        let label = options.label.as_ref().or(self.bindings().designation.as_ref());
        if let Some(label) = label {
            require(label.as_str())?;
        }
        for name in &options.attributes {
            require(name.as_str())?;
        }

        let columns = self
            .profiles()
            .map(|view| SketchColumn {
                profile_id: view.profile_id().clone(),
                horizons: view
                    .horizons()
                    .iter()
                    .map(|h| SketchHorizon {
                        interval: h.interval,
                        label: label
                            .map(|l| h.attribute(l))
                            .filter(|v| !v.is_null())
                            .map(Value::to_string),
                        color: match &coloring {
                            Coloring::Literal(c) => {
                                h.attribute(c).as_str().and_then(parse_color).unwrap_or_else(gray)
                            }
                            Coloring::Mapped(map) => map.color_for(h.attribute(&map.column)),
                            Coloring::Fixed(c) => *c,
                        },
                        values: options
                            .attributes
                            .iter()
                            .map(|a| (a.clone(), h.attribute(a).clone()))
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CollectionConfig, ColumnBindings};
    use crate::data::table::Table;

    fn collection() -> ProfileCollection {
        let horizons = Table::from_columns(vec![
            ("id", ["P1", "P1", "P3"].into_iter().map(Value::from).collect()),
            ("hzid", ["H1", "H2", "H8"].into_iter().map(Value::from).collect()),
            ("top", [0, 10, 0].into_iter().map(Value::from).collect()),
            ("bottom", [10, 25, 5].into_iter().map(Value::from).collect()),
            ("hzname", ["A", "Bt1", "O"].into_iter().map(Value::from).collect()),
            ("clay", [15, 35, 5].into_iter().map(Value::from).collect()),
            ("color", ["#A0522D", "#8B4513", "#000000"].into_iter().map(Value::from).collect()),
        ])
        .unwrap();
        let config = CollectionConfig::new(ColumnBindings::default().with_designation("hzname"));
        ProfileCollection::from_horizons(&horizons, &config).unwrap()
    }

    #[test]
    fn palette_is_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[1]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn color_map_skips_nulls_and_defaults_to_gray() {
        let values = BTreeSet::from([Value::from("A"), Value::from("Bt1"), Value::Null]);
        let map = ColorMap::new("hzname", &values);
        let legend = map.legend_entries();
        let labels: Vec<&str> = legend.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["A", "Bt1"]);
        assert_eq!(map.color_for(&Value::from("Bt1")), legend[1].1);
        assert_eq!(map.color_for(&Value::Null), gray());
        assert_eq!(map.color_for(&Value::from("C")), gray());
    }

    #[test]
    fn parses_hex_and_names() {
        assert_eq!(parse_color("#A0522D"), Some(Srgb::new(0xA0, 0x52, 0x2D)));
        assert_eq!(parse_color("SandyBrown"), Some(Srgb::new(244, 164, 96)));
        assert_eq!(parse_color("not-a-colour"), None);
    }

    #[test]
    fn literal_color_column_and_designation_labels() {
        let cols = collection()
            .sketch(&SketchOptions::new(ColorSpec::Column("color".into())))
            .unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].profile_id, Value::from("P1"));
        assert_eq!(cols[0].horizons[1].label.as_deref(), Some("Bt1"));
        assert_eq!(cols[0].horizons[0].color, Srgb::new(0xA0, 0x52, 0x2D));
    }

    #[test]
    fn categorical_column_maps_through_palette() {
        let mut options = SketchOptions::new(ColorSpec::Column("clay".into()));
        options.attributes.push("clay".into());
        let cols = collection().sketch(&options).unwrap();
        let a = cols[0].horizons[0].color;
        let b = cols[0].horizons[1].color;
        assert_ne!(a, b);
        assert_eq!(cols[1].horizons[0].values["clay"], Value::Integer(5));
    }

    #[test]
    fn fixed_and_unknown_colors() {
        let spc = collection();
        let cols = spc
            .sketch(&SketchOptions::new(ColorSpec::Fixed("sandybrown".into())))
            .unwrap();
        assert!(cols.iter().flat_map(|c| &c.horizons).all(|h| h.color == Srgb::new(244, 164, 96)));
        assert!(spc.sketch(&SketchOptions::new(ColorSpec::Fixed("mauve-ish".into()))).is_err());
        assert!(spc.sketch(&SketchOptions::new(ColorSpec::Column("munsell".into()))).is_err());
    }
}
