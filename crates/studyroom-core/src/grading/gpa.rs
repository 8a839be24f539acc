//! Letter grades, GPA and credit-weighted aggregation across courses.

use serde::{Deserialize, Serialize};

use super::boundary::GradeBoundaryTable;
use super::course_grade::course_grade;
use crate::course::Course;

/// Which courses feed the overall statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatsScope {
    /// Every course.
    #[default]
    Global,
    /// Courses of the active session only.
    Session,
}

impl std::str::FromStr for StatsScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(StatsScope::Global),
            "session" => Ok(StatsScope::Session),
            other => Err(format!("unknown scope '{other}' (expected global or session)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetterGrade {
    pub letter: String,
    pub gpa: f64,
}

impl LetterGrade {
    pub fn resolve(table: &GradeBoundaryTable, percentage: f64) -> Self {
        Self {
            letter: table.lookup_letter(percentage).to_string(),
            gpa: table.lookup_gpa(percentage),
        }
    }
}

/// Graded standing of a single course.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResult {
    pub course_id: String,
    pub name: String,
    pub percentage: f64,
    pub letter: String,
    pub gpa: f64,
    pub credits: f64,
}

/// `None` for a course with nothing graded yet: its grade is indeterminate.
pub fn course_result(course: &Course, global: &GradeBoundaryTable) -> Option<CourseResult> {
    let grade = course_grade(&course.evaluations);
    if !grade.has_data() {
        return None;
    }
    let letter = LetterGrade::resolve(course.boundaries(global), grade.percentage);
    Some(CourseResult {
        course_id: course.id.clone(),
        name: course.name.clone(),
        percentage: grade.percentage,
        letter: letter.letter,
        gpa: letter.gpa,
        credits: course.credits,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub overall_gpa: f64,
    pub average_percentage: f64,
    pub total_credits: f64,
    pub course_count: usize,
}

/// Credit-weighted GPA and average over the courses that have grades.
///
/// Returns `None` when no course has a completed evaluation.
pub fn aggregate<'a, I>(courses: I, global: &GradeBoundaryTable) -> Option<OverallStats>
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut total_credits = 0.0;
    let mut gpa_sum = 0.0;
    let mut percentage_sum = 0.0;
    let mut course_count = 0;

    for result in courses.into_iter().filter_map(|c| course_result(c, global)) {
        total_credits += result.credits;
        gpa_sum += result.gpa * result.credits;
        percentage_sum += result.percentage * result.credits;
        course_count += 1;
    }

    if course_count == 0 {
        return None;
    }

    let (overall_gpa, average_percentage) = if total_credits > 0.0 {
        (gpa_sum / total_credits, percentage_sum / total_credits)
    } else {
        (0.0, 0.0)
    };

    Some(OverallStats {
        overall_gpa,
        average_percentage,
        total_credits,
        course_count,
    })
}
