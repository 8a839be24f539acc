//! Application state: the in-memory snapshot and its persistence lifecycle.
//!
//! ## Lifecycle
//!
//! ```text
//! load(store) -> [mutation -> snapshot replaced -> save]* -> into_store()
//! ```
//!
//! Every mutation validates first and replaces whole entities, so a failed
//! command leaves the snapshot untouched. Saving happens after the snapshot
//! is updated; a failed save is logged and otherwise ignored, the snapshot
//! stays the source of truth for the running process.
//!
//! Reads never fail: unknown ids yield `None`.

use tracing::{debug, info, warn};

use crate::course::{Course, CourseUpdate, Evaluation, EvaluationUpdate, NewEvaluation, Weight};
use crate::error::{CoreError, Result};
use crate::grading::{
    aggregate, check_manual_weight, course_grade, course_result, effective_weights,
    target_projection, CourseGrade, CourseResult, GradeBoundaryTable, LetterGrade, OverallStats,
    StatsScope, TargetProjection, WeightPlan,
};
use crate::session::{GpaFormat, Session, Settings};
use crate::storage::{load_versioned, save_versioned, KeyValueStore};

pub const COURSES_KEY: &str = "courses";
pub const SESSIONS_KEY: &str = "sessions";
pub const SETTINGS_KEY: &str = "settings";

/// Owner of the entity snapshot.
pub struct AppState<S: KeyValueStore> {
    store: S,
    courses: Vec<Course>,
    sessions: Vec<Session>,
    settings: Settings,
}

impl<S: KeyValueStore> AppState<S> {
    /// Read the snapshot from `store`; absent keys start empty.
    ///
    /// Guarantees at least one session and a valid active session pointer.
    ///
    /// # Errors
    /// Returns an error if a stored payload is malformed or was written by a
    /// newer version.
    pub fn load(store: S) -> Result<Self> {
        let courses: Vec<Course> = load_versioned(&store, COURSES_KEY)?.unwrap_or_default();
        let sessions: Vec<Session> = load_versioned(&store, SESSIONS_KEY)?.unwrap_or_default();
        let settings: Settings = load_versioned(&store, SETTINGS_KEY)?.unwrap_or_default();
        debug!(
            courses = courses.len(),
            sessions = sessions.len(),
            "loaded snapshot"
        );

        let mut state = Self {
            store,
            courses,
            sessions,
            settings,
        };
        state.ensure_active_session();
        Ok(state)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn active_session(&self) -> Option<&Session> {
        let id = self.settings.active_session_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Global grade table.
    pub fn grade_boundaries(&self) -> &GradeBoundaryTable {
        &self.settings.grade_boundaries
    }

    /// Table a course grades against (its own or the global one).
    pub fn course_boundaries(&self, course_id: &str) -> Option<&GradeBoundaryTable> {
        self.course(course_id)
            .map(|c| c.boundaries(&self.settings.grade_boundaries))
    }

    pub fn course_grade(&self, course_id: &str) -> Option<CourseGrade> {
        self.course(course_id).map(|c| course_grade(&c.evaluations))
    }

    /// `None` for unknown courses and for courses with nothing graded yet.
    pub fn course_letter_and_gpa(&self, course_id: &str) -> Option<LetterGrade> {
        let course = self.course(course_id)?;
        let grade = course_grade(&course.evaluations);
        if !grade.has_data() {
            return None;
        }
        Some(LetterGrade::resolve(
            course.boundaries(&self.settings.grade_boundaries),
            grade.percentage,
        ))
    }

    pub fn course_target(&self, course_id: &str) -> Option<TargetProjection> {
        let course = self.course(course_id)?;
        target_projection(&course.evaluations, course.objective)
    }

    pub fn weight_plan(&self, course_id: &str) -> Option<WeightPlan> {
        self.course(course_id)
            .map(|c| WeightPlan::for_evaluations(&c.evaluations))
    }

    /// Effective weight of each evaluation, keyed by evaluation id.
    pub fn effective_weights(&self, course_id: &str) -> Option<Vec<(String, f64)>> {
        let course = self.course(course_id)?;
        Some(
            effective_weights(&course.evaluations)
                .into_iter()
                .map(|(e, weight)| (e.id.clone(), weight))
                .collect(),
        )
    }

    /// Courses feeding statistics for `scope`.
    pub fn scoped_courses(&self, scope: StatsScope) -> Vec<&Course> {
        match scope {
            StatsScope::Global => self.courses.iter().collect(),
            StatsScope::Session => {
                let active = self.settings.active_session_id.as_deref();
                self.courses
                    .iter()
                    .filter(|c| Some(c.session_id.as_str()) == active)
                    .collect()
            }
        }
    }

    /// Per-course results for `scope`, ungraded courses left out.
    pub fn course_results(&self, scope: StatsScope) -> Vec<CourseResult> {
        self.scoped_courses(scope)
            .into_iter()
            .filter_map(|c| course_result(c, &self.settings.grade_boundaries))
            .collect()
    }

    /// `None` when no course in scope has a completed evaluation.
    pub fn overall_stats(&self, scope: StatsScope) -> Option<OverallStats> {
        aggregate(self.scoped_courses(scope), &self.settings.grade_boundaries)
    }

    // ── Courses ──────────────────────────────────────────────────────

    /// Create a course in the active session.
    pub fn add_course(&mut self, name: &str, objective: f64, credits: f64) -> Result<Course> {
        let session_id = self.ensure_active_session();
        let course = Course::create(name, objective, credits, session_id)?;
        self.courses.push(course.clone());
        info!(course_id = %course.id, name = %course.name, "course added");
        self.persist_courses();
        Ok(course)
    }

    pub fn update_course(&mut self, course_id: &str, update: &CourseUpdate) -> Result<Course> {
        let index = self.course_index(course_id)?;
        if let Some(session_id) = &update.session_id {
            if !self.sessions.iter().any(|s| &s.id == session_id) {
                return Err(CoreError::not_found("session", session_id.clone()));
            }
        }
        let updated = update.apply(&self.courses[index])?;
        self.courses[index] = updated.clone();
        info!(course_id, "course updated");
        self.persist_courses();
        Ok(updated)
    }

    /// Remove a course together with its evaluations.
    pub fn delete_course(&mut self, course_id: &str) -> Result<Course> {
        let index = self.course_index(course_id)?;
        let removed = self.courses.remove(index);
        info!(
            course_id,
            evaluations = removed.evaluations.len(),
            "course deleted"
        );
        self.persist_courses();
        Ok(removed)
    }

    pub fn set_course_custom_boundaries(
        &mut self,
        course_id: &str,
        boundaries: Option<GradeBoundaryTable>,
    ) -> Result<()> {
        let index = self.course_index(course_id)?;
        let mut updated = self.courses[index].clone();
        updated.custom_grade_boundaries = boundaries;
        info!(
            course_id,
            custom = updated.custom_grade_boundaries.is_some(),
            "course boundaries replaced"
        );
        self.courses[index] = updated;
        self.persist_courses();
        Ok(())
    }

    // ── Evaluations ──────────────────────────────────────────────────

    pub fn add_evaluation(&mut self, course_id: &str, new: NewEvaluation) -> Result<Evaluation> {
        let index = self.course_index(course_id)?;
        let evaluation = Evaluation::create(new)?;
        if let Weight::Manual(weight) = evaluation.weight {
            check_manual_weight(&self.courses[index].evaluations, None, weight)?;
        }

        let mut updated = self.courses[index].clone();
        updated.evaluations.push(evaluation.clone());
        self.replace_course(index, updated);
        info!(course_id, evaluation_id = %evaluation.id, "evaluation added");
        self.persist_courses();
        Ok(evaluation)
    }

    pub fn update_evaluation(
        &mut self,
        course_id: &str,
        evaluation_id: &str,
        update: &EvaluationUpdate,
    ) -> Result<Evaluation> {
        let index = self.course_index(course_id)?;
        let course = &self.courses[index];
        let position = course
            .evaluations
            .iter()
            .position(|e| e.id == evaluation_id)
            .ok_or_else(|| CoreError::not_found("evaluation", evaluation_id))?;

        let evaluation = update.apply(&course.evaluations[position])?;
        if let Weight::Manual(weight) = evaluation.weight {
            check_manual_weight(&course.evaluations, Some(evaluation_id), weight)?;
        }

        let mut updated = course.clone();
        updated.evaluations[position] = evaluation.clone();
        self.replace_course(index, updated);
        info!(course_id, evaluation_id, "evaluation updated");
        self.persist_courses();
        Ok(evaluation)
    }

    pub fn delete_evaluation(&mut self, course_id: &str, evaluation_id: &str) -> Result<Evaluation> {
        let index = self.course_index(course_id)?;
        let position = self.courses[index]
            .evaluations
            .iter()
            .position(|e| e.id == evaluation_id)
            .ok_or_else(|| CoreError::not_found("evaluation", evaluation_id))?;

        let mut updated = self.courses[index].clone();
        let removed = updated.evaluations.remove(position);
        self.replace_course(index, updated);
        info!(course_id, evaluation_id, "evaluation deleted");
        self.persist_courses();
        Ok(removed)
    }

    // ── Grade boundaries & settings ──────────────────────────────────

    /// Replace the global table. The table type is valid by construction.
    pub fn update_grade_boundaries(&mut self, boundaries: GradeBoundaryTable) {
        self.settings.grade_boundaries = boundaries;
        info!(bands = self.settings.grade_boundaries.len(), "grade boundaries updated");
        self.persist_settings();
    }

    pub fn reset_grade_boundaries_to_default(&mut self) {
        self.update_grade_boundaries(GradeBoundaryTable::reset_to_default());
    }

    pub fn set_gpa_format(&mut self, format: GpaFormat) {
        self.settings.gpa_format = format;
        self.persist_settings();
    }

    /// GPA rendered with the configured format against `table`'s scale.
    pub fn format_gpa(&self, gpa: f64, table: &GradeBoundaryTable) -> String {
        self.settings.gpa_format.format(gpa, table.max_gpa())
    }

    // ── Sessions ─────────────────────────────────────────────────────

    pub fn add_session(&mut self, name: &str) -> Result<Session> {
        let session = Session::create(name)?;
        self.sessions.push(session.clone());
        info!(session_id = %session.id, name = %session.name, "session added");
        self.persist_sessions();
        Ok(session)
    }

    pub fn rename_session(&mut self, session_id: &str, name: &str) -> Result<Session> {
        let index = self.session_index(session_id)?;
        let mut renamed = Session::create(name)?;
        renamed.id = self.sessions[index].id.clone();
        renamed.created_at = self.sessions[index].created_at;
        self.sessions[index] = renamed.clone();
        self.persist_sessions();
        Ok(renamed)
    }

    pub fn set_active_session(&mut self, session_id: &str) -> Result<()> {
        self.session_index(session_id)?;
        self.settings.active_session_id = Some(session_id.to_string());
        info!(session_id, "active session changed");
        self.persist_settings();
        Ok(())
    }

    /// Remove a session and its courses.
    ///
    /// If it was active, the first remaining session becomes active, or a
    /// fresh default session is created when none remain.
    pub fn delete_session(&mut self, session_id: &str) -> Result<Session> {
        let index = self.session_index(session_id)?;
        let removed = self.sessions.remove(index);
        let before = self.courses.len();
        self.courses.retain(|c| c.session_id != removed.id);
        info!(
            session_id,
            courses = before - self.courses.len(),
            "session deleted"
        );

        self.persist_sessions();
        if before != self.courses.len() {
            self.persist_courses();
        }
        self.ensure_active_session();
        Ok(removed)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn course_index(&self, course_id: &str) -> Result<usize> {
        self.courses
            .iter()
            .position(|c| c.id == course_id)
            .ok_or_else(|| CoreError::not_found("course", course_id))
    }

    fn session_index(&self, session_id: &str) -> Result<usize> {
        self.sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(|| CoreError::not_found("session", session_id))
    }

    fn replace_course(&mut self, index: usize, course: Course) {
        let plan = WeightPlan::for_evaluations(&course.evaluations);
        if plan.auto_starved() {
            warn!(
                course_id = %course.id,
                auto_count = plan.auto_count,
                "manual weights use 100%, auto-weighted evaluations count for 0%"
            );
        }
        self.courses[index] = course;
    }

    /// Make sure a session exists and is active; returns the active id.
    fn ensure_active_session(&mut self) -> String {
        if let Some(active) = self.active_session() {
            return active.id.clone();
        }

        let mut created = false;
        if self.sessions.is_empty() {
            self.sessions.push(Session::default_session());
            created = true;
        }
        let id = self.sessions[0].id.clone();
        self.settings.active_session_id = Some(id.clone());
        info!(session_id = %id, created, "active session reassigned");

        if created {
            self.persist_sessions();
        }
        self.persist_settings();
        id
    }

    fn persist_courses(&mut self) {
        if let Err(e) = save_versioned(&mut self.store, COURSES_KEY, &self.courses) {
            warn!(key = COURSES_KEY, error = %e, "failed to persist");
        }
    }

    fn persist_sessions(&mut self) {
        if let Err(e) = save_versioned(&mut self.store, SESSIONS_KEY, &self.sessions) {
            warn!(key = SESSIONS_KEY, error = %e, "failed to persist");
        }
    }

    fn persist_settings(&mut self) {
        if let Err(e) = save_versioned(&mut self.store, SETTINGS_KEY, &self.settings) {
            warn!(key = SETTINGS_KEY, error = %e, "failed to persist");
        }
    }
}
