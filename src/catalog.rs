//! The fixed schema of the monster statistics file.
//!
//! Every CSV column has exactly one `Column` variant, declared in file order,
//! so `Column::index` is the position of the field inside a `Record`.

macro_rules! catalog {
    ($($variant:ident => $key:literal),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Column {
            $($variant),+
        }

        impl Column {
            /// All columns in CSV order.
            pub const ALL: &'static [Column] = &[$(Column::$variant),+];

            /// Machine key, the identifier the column is addressed by in events.
            pub fn key(self) -> &'static str {
                match self {
                    $(Column::$variant => $key),+
                }
            }
        }
    };
}

catalog! {
    Name => "_name",
    Cr => "cr",
    Xp => "xp",
    Race => "race",
    Class1 => "class1",
    Class1Lvl => "class1_lvl",
    Class2 => "class2",
    Class2Lvl => "class2_lvl",
    Alignment => "alignment",
    Size => "size",
    Type => "type",
    Subtype1 => "subtype1",
    Subtype2 => "subtype2",
    Subtype3 => "subtype3",
    Subtype4 => "subtype4",
    Subtype5 => "subtype5",
    Subtype6 => "subtype6",
    Ac => "ac",
    AcTouch => "ac_touch",
    AcFlatFooted => "ac_flat_footed",
    Hp => "hp",
    Hd => "hd",
    Fort => "fort",
    Ref => "ref",
    Will => "will",
    Melee => "melee",
    Ranged => "ranged",
    Space => "space",
    Reach => "reach",
    Str => "_str",
    Dex => "dex",
    Con => "con",
    Int => "int",
    Wis => "wis",
    Cha => "cha",
    Feats => "feats",
    Skills => "skills",
    RacialMods => "racialmods",
    Languages => "languages",
    Sq => "sq",
    Environment => "environment",
    Organization => "organization",
    Treasure => "treasure",
    Group => "group",
    Gear => "gear",
    OtherGear => "othergear",
    CharacterFlag => "characterflag",
    CompanionFlag => "companionflag",
    Speed => "speed",
    BaseSpeed => "base_speed",
    FlySpeed => "fly_speed",
    Maneuverability => "maneuverability",
    ClimbSpeed => "climb_speed",
    SwimSpeed => "swim_speed",
    BurrowSpeed => "burrow_speed",
    SpeedSpecial => "speed_special",
    SpeedLand => "speed_land",
    Fly => "fly",
    Climb => "climb",
    Burrow => "burrow",
    Swim => "swim",
    VariantParent => "variantparent",
    ClassArchetypes => "classarchetypes",
    CompanionFamiliarLink => "companionfamiliarlink",
    AlternateNameForm => "alternatenameform",
    Id => "id",
    UniqueMonster => "uniquemonster",
    Mr => "mr",
    Mythic => "mythic",
    Mt => "mt",
    Source => "source",
}

impl Column {
    /// Number of fields in every record.
    pub const COUNT: usize = Column::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Column> {
        Column::ALL.get(index).copied()
    }

    pub fn from_key(key: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.key() == key)
    }

    /// Human readable title: `class1_lvl` becomes `Class1 Lvl`.
    pub fn title(self) -> String {
        self.key()
            .split('_')
            .filter(|segment| !segment.is_empty())
            .map(capitalize)
            .collect::<Vec<String>>()
            .join(" ")
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_follows_declaration_order() {
        for (position, column) in Column::ALL.iter().enumerate() {
            assert_eq!(column.index(), position);
            assert_eq!(Column::from_index(position), Some(*column));
        }
        assert_eq!(Column::Name.index(), 0);
        assert_eq!(Column::Size.index(), 9);
        assert_eq!(Column::Type.index(), 10);
        assert_eq!(Column::COUNT, 71);
        assert_eq!(Column::from_index(Column::COUNT), None);
    }

    #[test]
    fn titles_drop_empty_segments_and_capitalize() {
        assert_eq!(Column::Name.title(), "Name");
        assert_eq!(Column::Str.title(), "Str");
        assert_eq!(Column::Class1Lvl.title(), "Class1 Lvl");
        assert_eq!(Column::AcFlatFooted.title(), "Ac Flat Footed");
        assert_eq!(Column::Source.title(), "Source");
    }

    #[test]
    fn keys_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_key(column.key()), Some(*column));
        }
        assert_eq!(Column::from_key("name"), None);
        assert_eq!(Column::from_key(""), None);
    }
}
