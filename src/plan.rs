//! Event plan progress.
//!
//! An event's plan is six fixed sections of three tasks each. Whether a task is
//! done is derived from the event record and from counts of related records,
//! which the caller fetches from its own storage and passes in as [`PlanCounts`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Draft,
    Open,
    Closed,
    Completed,
    Cancelled,
}

impl EventStatus {
    /// Whether the event has been published at some point
    pub fn is_published(self) -> bool {
        matches!(self, EventStatus::Open | EventStatus::Closed | EventStatus::Completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSectionId {
    Concept,
    Shops,
    Amenities,
    Publicity,
    PostReport,
    Comments,
}

impl PlanSectionId {
    pub fn slug(self) -> &'static str {
        match self {
            PlanSectionId::Concept => "concept",
            PlanSectionId::Shops => "shops",
            PlanSectionId::Amenities => "amenities",
            PlanSectionId::Publicity => "publicity",
            PlanSectionId::PostReport => "post_report",
            PlanSectionId::Comments => "comments",
        }
    }
}

/// The parts of an event record the plan looks at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub id: String,
    pub title: String,
    pub status: EventStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub max_vendors: Option<u32>,
}

impl EventSnapshot {
    /// Any non-empty text counts as filled in, whitespace included
    fn has_basic_info(&self) -> bool {
        let filled = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.is_empty());
        filled(&self.description) && filled(&self.location) && self.max_vendors.is_some_and(|n| n > 0)
    }
}

/// Counts of records related to one event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanCounts {
    pub event_photos: u32,
    pub vendor_targets: u32,
    pub accepted_applications: u32,
    pub meeting_slots: u32,
    /// Bookings in REQUESTED or CONFIRMED state
    pub active_equipment_bookings: u32,
    pub staffing_plans: u32,
    pub confirmed_volunteers: u32,
    pub notifications: u32,
    pub sales_records: u32,
    pub feedback: u32,
    pub public_feedback: u32,
    pub accounting_reports: u32,
    pub activity_reports: u32,
    pub specs_generated: u32,
    pub feedback_visibility_changes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub done: bool,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSection {
    pub id: PlanSectionId,
    pub title: String,
    pub description: String,
    pub tasks: Vec<PlanTask>,
    pub done_count: u32,
    pub total_count: u32,
    pub completed: bool,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPlan {
    pub event_id: String,
    pub event_title: String,
    pub status: EventStatus,
    pub sections: Vec<PlanSection>,
    pub completed_sections: u32,
    pub total_sections: u32,
    pub completed_tasks: u32,
    pub total_tasks: u32,
}

fn task(id: &str, title: &str, description: &str, done: bool, href: String) -> PlanTask {
    PlanTask {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        done,
        href,
    }
}

fn section(event_id: &str, id: PlanSectionId, title: &str, description: &str, tasks: Vec<PlanTask>) -> PlanSection {
    let done_count = tasks.iter().filter(|t| t.done).count() as u32;
    let total_count = tasks.len() as u32;
    PlanSection {
        id,
        title: title.to_string(),
        description: description.to_string(),
        tasks,
        done_count,
        total_count,
        completed: done_count == total_count,
        href: format!("/organizer/events/{}/plan/{}", event_id, id.slug()),
    }
}

/// Builds the plan checklist for an event
pub fn build_event_plan(event: &EventSnapshot, counts: &PlanCounts) -> EventPlan {
    let id = event.id.as_str();
    let organizer = |page: &str| format!("/organizer/events/{}/{}", id, page);
    let published = event.status.is_published();

    let sections = vec![
        section(id, PlanSectionId::Concept, "Concept", "Settle the basics and get ready to publish.", vec![
            task("concept-basic", "Fill in the basics", "Description, location and vendor capacity",
                event.has_basic_info(), organizer("edit")),
            task("concept-publish", "Set the publication status", "Open the event for applications",
                published, organizer("applications")),
            task("concept-spec", "Generate the event spec", "Write down and review the plan",
                counts.specs_generated > 0, organizer("spec")),
        ]),
        section(id, PlanSectionId::Shops, "Shops", "From shortlisting bakeries to confirming them.", vec![
            task("shops-targets", "Shortlist bakeries", "Add candidate vendors with a priority",
                counts.vendor_targets > 0, organizer("meetings")),
            task("shops-meetings", "Schedule meetings", "Create meeting slots",
                counts.meeting_slots > 0, organizer("meetings")),
            task("shops-accept", "Confirm vendors", "Accept at least one application",
                counts.accepted_applications > 0, organizer("applications")),
        ]),
        section(id, PlanSectionId::Amenities, "Amenities", "Equipment, staff and volunteers.", vec![
            task("amenities-equip", "Book equipment", "Request or confirm the equipment you need",
                counts.active_equipment_bookings > 0, organizer("equipment")),
            task("amenities-staffing", "Plan staffing", "Set headcount per role",
                counts.staffing_plans > 0, organizer("staffing")),
            task("amenities-volunteer", "Recruit volunteers", "Have at least one confirmed volunteer",
                counts.confirmed_volunteers > 0, organizer("volunteers")),
        ]),
        section(id, PlanSectionId::Publicity, "Publicity", "Promotion material and the public page.", vec![
            task("publicity-photo", "Add event photos", "Photos for the public page",
                counts.event_photos > 0, "/dashboard/media".to_string()),
            task("publicity-notification", "Prepare announcements", "Create an email or DM notification",
                counts.notifications > 0, organizer("applications")),
            task("publicity-public-page", "Check the public page", "Make sure the event page is live",
                published, format!("/events/{}", id)),
        ]),
        section(id, PlanSectionId::PostReport, "Post-event report", "Record sales and write the reports.", vec![
            task("post-sales", "Record sales", "Enter sales records",
                counts.sales_records > 0, organizer("sales")),
            task("post-accounting", "Generate the accounting report", "Export the accounting report once",
                counts.accounting_reports > 0, organizer("reports")),
            task("post-activity", "Generate the activity report", "Export the activity report once",
                counts.activity_reports > 0, organizer("reports")),
        ]),
        section(id, PlanSectionId::Comments, "Comments", "Collect feedback and choose what is public.", vec![
            task("comments-collected", "Collect feedback", "Receive at least one comment",
                counts.feedback > 0, format!("/events/{}/feedback", id)),
            task("comments-published", "Publish comments", "Make at least one comment public",
                counts.public_feedback > 0, organizer("reports")),
            task("comments-reviewed", "Review comments", "Toggle comment visibility",
                counts.feedback_visibility_changes > 0, organizer("reports")),
        ]),
    ];

    let completed_sections = sections.iter().filter(|s| s.completed).count() as u32;
    let total_sections = sections.len() as u32;
    let completed_tasks = sections.iter().map(|s| s.done_count).sum();
    let total_tasks = sections.iter().map(|s| s.total_count).sum();

    EventPlan {
        event_id: event.id.clone(),
        event_title: event.title.clone(),
        status: event.status,
        sections,
        completed_sections,
        total_sections,
        completed_tasks,
        total_tasks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_event() -> EventSnapshot {
        EventSnapshot {
            id: "evt-1".to_string(),
            title: "Spring Bread Market".to_string(),
            status: EventStatus::Draft,
            description: None,
            location: None,
            max_vendors: None,
        }
    }

    #[test]
    fn fresh_event_has_nothing_done() {
        let plan = build_event_plan(&draft_event(), &PlanCounts::default());

        assert_eq!(plan.total_sections, 6);
        assert_eq!(plan.total_tasks, 18);
        assert_eq!(plan.completed_tasks, 0);
        assert_eq!(plan.completed_sections, 0);
        assert_eq!(plan.sections[4].href, "/organizer/events/evt-1/plan/post_report");
    }

    #[test]
    fn concept_section_completes() {
        let event = EventSnapshot {
            status: EventStatus::Open,
            description: Some("Bakeries from all over town".to_string()),
            location: Some("Station square".to_string()),
            max_vendors: Some(30),
            ..draft_event()
        };
        let counts = PlanCounts {
            specs_generated: 1,
            ..PlanCounts::default()
        };

        let plan = build_event_plan(&event, &counts);

        let concept = &plan.sections[0];
        assert_eq!(concept.id, PlanSectionId::Concept);
        assert!(concept.completed);
        assert_eq!(concept.done_count, 3);
        // Publishing also ticks the public page task
        assert!(plan.sections[3].tasks[2].done);
        assert_eq!(plan.completed_tasks, 4);
        assert_eq!(plan.completed_sections, 1);
    }

    #[test]
    fn basic_info_needs_non_empty_fields() {
        let event = EventSnapshot {
            description: Some("   ".to_string()),
            location: Some("Park".to_string()),
            max_vendors: Some(10),
            ..draft_event()
        };
        let plan = build_event_plan(&event, &PlanCounts::default());
        assert!(plan.sections[0].tasks[0].done);

        for missing in [
            EventSnapshot {
                description: Some(String::new()),
                ..event.clone()
            },
            EventSnapshot {
                location: None,
                ..event.clone()
            },
            EventSnapshot {
                max_vendors: Some(0),
                ..event.clone()
            },
        ] {
            let plan = build_event_plan(&missing, &PlanCounts::default());
            assert!(!plan.sections[0].tasks[0].done);
        }
    }

    #[test]
    fn cancelled_events_are_not_published() {
        assert!(!EventStatus::Cancelled.is_published());
        assert!(EventStatus::Completed.is_published());
    }
}
