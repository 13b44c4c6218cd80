use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} code '{code}'")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: String,
}

/// Declares a closed vocabulary of wire codes. The variant name is the code.
macro_rules! code_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $label:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn code(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for $name {
            type Err = UnknownCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|value| value.code().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| UnknownCode {
                        kind: $kind,
                        code: trimmed.to_string(),
                    })
            }
        }
    };
}

code_enum!(
    /// General-education requirement a course may fulfil.
    HubRequirement, "hub requirement", {
        PLM => "Philosophical Inquiry and Life's Meanings",
        AEX => "Aesthetic Exploration",
        HCO => "Historical Consciousness",
        SI1 => "Scientific Inquiry I",
        SO1 => "Social Inquiry I",
        SI2 => "Scientific Inquiry II",
        SO2 => "Social Inquiry II",
        QR1 => "Quantitative Reasoning I",
        QR2 => "Quantitative Reasoning II",
        IIC => "The Individual in Community",
        GCI => "Global Citizenship and Intercultural Literacy",
        ETR => "Ethical Reasoning",
        FYW => "First-Year Writing Seminar",
        WRI => "Writing, Research, and Inquiry",
        WIN => "Writing-Intensive Course",
        OSC => "Oral and/or Signed Communication",
        DME => "Digital/Multimedia Expression",
        CRT => "Critical Thinking",
        RIL => "Research and Information Literacy",
        TWC => "Teamwork/Collaboration",
        CRI => "Creativity/Innovation",
    }
);

code_enum!(
    College, "college", {
        CAS => "College of Arts & Sciences",
        KHC => "Kilachand Honors College",
        HUB => "BU Hub",
        MED => "Chobanian & Avedisian School of Medicine",
        COM => "College of Communication",
        ENG => "College of Engineering",
        CFA => "College of Fine Arts",
        CGS => "College of General Studies",
        CDS => "Faculty of Computing & Data Sciences",
        GMS => "Graduate Medical Sciences",
        SDM => "Goldman School of Dental Medicine",
        QST => "Questrom School of Business",
        SAR => "Sargent College of Health & Rehabilitation Sciences",
        SHA => "School of Hospitality Administration",
        LAW => "School of Law",
        SPH => "School of Public Health",
        SSW => "School of Social Work",
        STH => "School of Theology",
        WED => "Wheelock College of Education & Human Development",
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "byCourseCode")]
    ByCourseCode,
    #[serde(rename = "byRating")]
    ByRating,
    #[serde(rename = "byReviews")]
    ByReviewCount,
}

impl SortKey {
    pub fn wire_value(self) -> &'static str {
        match self {
            SortKey::ByCourseCode => "byCourseCode",
            SortKey::ByRating => "byRating",
            SortKey::ByReviewCount => "byReviews",
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "byCourseCode" | "course-code" => Ok(SortKey::ByCourseCode),
            "byRating" | "rating" => Ok(SortKey::ByRating),
            "byReviews" | "reviews" => Ok(SortKey::ByReviewCount),
            other => Err(UnknownCode {
                kind: "sort key",
                code: other.to_string(),
            }),
        }
    }
}
