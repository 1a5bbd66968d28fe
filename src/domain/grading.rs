use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LetterGrade {
    A,
    BPlus,
    B,
    CPlus,
    C,
    DPlus,
    D,
    F,
}

/// Lower score bound of each grade, highest first. The first bound the score
/// reaches wins; anything below the last bound is an F.
const THRESHOLDS: [(f64, LetterGrade); 7] = [
    (8.5, LetterGrade::A),
    (8.0, LetterGrade::BPlus),
    (7.0, LetterGrade::B),
    (6.5, LetterGrade::CPlus),
    (5.5, LetterGrade::C),
    (5.0, LetterGrade::DPlus),
    (4.0, LetterGrade::D),
];

impl LetterGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }

    /// Value on the 4.0 scale.
    pub fn points(&self) -> f64 {
        match self {
            LetterGrade::A => 4.0,
            LetterGrade::BPlus => 3.5,
            LetterGrade::B => 3.0,
            LetterGrade::CPlus => 2.5,
            LetterGrade::C => 2.0,
            LetterGrade::DPlus => 1.5,
            LetterGrade::D => 1.0,
            LetterGrade::F => 0.0,
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a 10-point score to its letter grade. Total over all inputs: scores
/// above 10 land on A, negative scores and NaN on F.
pub fn score_to_grade(score10: f64) -> LetterGrade {
    THRESHOLDS
        .iter()
        .find(|(min, _)| score10 >= *min)
        .map(|(_, grade)| *grade)
        .unwrap_or(LetterGrade::F)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rank {
    Excellent,
    Good,
    Fair,
    Average,
    Weak,
}

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Excellent => "Excellent",
            Rank::Good => "Good",
            Rank::Fair => "Fair",
            Rank::Average => "Average",
            Rank::Weak => "Weak",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a cumulative GPA on the 4.0 scale.
pub fn rank(gpa4: f64) -> Rank {
    if gpa4 >= 3.6 {
        Rank::Excellent
    } else if gpa4 >= 3.2 {
        Rank::Good
    } else if gpa4 >= 2.5 {
        Rank::Fair
    } else if gpa4 >= 2.0 {
        Rank::Average
    } else {
        Rank::Weak
    }
}
