use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + label + std::str::FromStr pattern.
/// The wire string doubles as the serde representation.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => ($s:literal, $label:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Human-readable label for forms and reports.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Smoking {
    Never => ("never", "Never smoked"),
    Former => ("former", "Former smoker"),
    Occasional => ("occasional", "Occasional smoker"),
    Regular => ("regular", "Regular smoker"),
});

str_enum!(Alcohol {
    Never => ("never", "Never"),
    Occasional => ("occasional", "Occasional (1-2 drinks/week)"),
    Moderate => ("moderate", "Moderate (3-7 drinks/week)"),
    Heavy => ("heavy", "Heavy (8+ drinks/week)"),
});

str_enum!(Exercise {
    Sedentary => ("sedentary", "Sedentary (little to no exercise)"),
    Light => ("light", "Light (1-3 days/week)"),
    Moderate => ("moderate", "Moderate (3-5 days/week)"),
    Active => ("active", "Active (6-7 days/week)"),
    VeryActive => ("very-active", "Very active (twice daily)"),
});

str_enum!(Diet {
    Balanced => ("balanced", "Balanced diet"),
    Vegetarian => ("vegetarian", "Vegetarian"),
    Vegan => ("vegan", "Vegan"),
    Keto => ("keto", "Keto/Low-carb"),
    Paleo => ("paleo", "Paleo"),
    Mediterranean => ("mediterranean", "Mediterranean"),
    Unhealthy => ("unhealthy", "Mostly processed foods"),
});

str_enum!(SleepHours {
    UnderFive => ("<5", "Less than 5 hours"),
    FiveToSix => ("5-6", "5-6 hours"),
    SevenToEight => ("7-8", "7-8 hours"),
    NinePlus => ("9+", "9+ hours"),
});

str_enum!(Frequency {
    Daily => ("daily", "Daily"),
    Custom => ("custom", "Custom days"),
});

// Declaration order is Monday-first; sets of weekdays sort that way.
str_enum!(Weekday {
    Monday => ("monday", "Mon"),
    Tuesday => ("tuesday", "Tue"),
    Wednesday => ("wednesday", "Wed"),
    Thursday => ("thursday", "Thu"),
    Friday => ("friday", "Fri"),
    Saturday => ("saturday", "Sat"),
    Sunday => ("sunday", "Sun"),
});

str_enum!(Mood {
    Happy => ("happy", "Happy"),
    Neutral => ("neutral", "Neutral"),
    Sad => ("sad", "Sad"),
    Anxious => ("anxious", "Anxious"),
    Stressed => ("stressed", "Stressed"),
    Tired => ("tired", "Tired"),
});

impl Default for Smoking {
    fn default() -> Self {
        Self::Never
    }
}

impl Default for Alcohol {
    fn default() -> Self {
        Self::Never
    }
}

impl Default for Exercise {
    fn default() -> Self {
        Self::Sedentary
    }
}

impl Default for Diet {
    fn default() -> Self {
        Self::Balanced
    }
}

impl Default for SleepHours {
    fn default() -> Self {
        Self::SevenToEight
    }
}

impl Weekday {
    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn wire_strings_round_trip_through_from_str() {
        for e in Exercise::ALL {
            assert_eq!(Exercise::from_str(e.as_str()).unwrap(), *e);
        }
        assert_eq!(SleepHours::from_str("<5").unwrap(), SleepHours::UnderFive);
    }

    #[test]
    fn unknown_value_is_invalid_enum() {
        let err = Mood::from_str("elated").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
        assert!(err.to_string().contains("elated"));
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&Exercise::VeryActive).unwrap();
        assert_eq!(json, "\"very-active\"");
        let sleep: SleepHours = serde_json::from_str("\"9+\"").unwrap();
        assert_eq!(sleep, SleepHours::NinePlus);
    }

    #[test]
    fn lifestyle_defaults() {
        assert_eq!(Smoking::default(), Smoking::Never);
        assert_eq!(Alcohol::default(), Alcohol::Never);
        assert_eq!(Exercise::default(), Exercise::Sedentary);
        assert_eq!(Diet::default(), Diet::Balanced);
        assert_eq!(SleepHours::default(), SleepHours::SevenToEight);
    }

    #[test]
    fn weekday_from_chrono_and_order() {
        assert_eq!(Weekday::from_chrono(chrono::Weekday::Sun), Weekday::Sunday);
        assert!(Weekday::Monday < Weekday::Sunday);
        assert_eq!(Weekday::ALL.len(), 7);
    }
}
