// src/pipeline/inject.rs

//! Reinjection of instructor profiles into the schedule.

use crate::models::{Course, Document, EnrichedCourse, InstructorProfile};

use super::rate::RatingMap;

/// Replace every course's instructor name with its profile.
///
/// Names missing from `ratings` get the bare `{fullName}` fallback. Terms,
/// courses and their order are left exactly as they were.
pub fn inject_ratings(document: Document<Course>, ratings: &RatingMap) -> Document<EnrichedCourse> {
    let mut missing = 0usize;

    let enriched = document.map_courses(|course| {
        let name = course.instructor_name();
        let instructor = match ratings.get(name) {
            Some(profile) => profile.clone(),
            None => {
                missing += 1;
                InstructorProfile::unrated(name)
            }
        };
        EnrichedCourse {
            instructor,
            fields: course.fields,
        }
    });

    if missing > 0 {
        log::warn!("{} courses had instructors absent from the rating map", missing);
    }

    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExternalId, Layout, RatingRecord};
    use serde_json::json;

    fn jane_ratings() -> RatingMap {
        RatingMap::from([(
            "Jane Doe".to_string(),
            InstructorProfile::rated(
                "Jane Doe",
                RatingRecord {
                    first_name: "Jane".to_string(),
                    last_name: "Doe".to_string(),
                    rating: Some(4.0),
                    id: ExternalId::Numeric(12345),
                },
            ),
        )])
    }

    fn inject(value: serde_json::Value, ratings: &RatingMap) -> serde_json::Value {
        let document = Document::from_value(value).unwrap();
        inject_ratings(document, ratings).to_value().unwrap()
    }

    #[test]
    fn test_empty_document_unchanged() {
        assert_eq!(inject(json!([]), &RatingMap::new()), json!([]));
    }

    #[test]
    fn test_injects_rated_instructor() {
        assert_eq!(
            inject(json!([{"instructor": "Jane Doe"}]), &jane_ratings()),
            json!([{
                "instructor": {
                    "fullName": "Jane Doe",
                    "firstName": "Jane",
                    "lastName": "Doe",
                    "rating": 4.0,
                    "rmpId": 12345,
                }
            }])
        );
    }

    #[test]
    fn test_unknown_name_gets_fallback() {
        assert_eq!(
            inject(json!([{"instructor": "John Doe"}]), &jane_ratings()),
            json!([{"instructor": {"fullName": "John Doe"}}])
        );
    }

    #[test]
    fn test_placeholder_is_injected_like_any_name() {
        let ratings = RatingMap::from([("TBD".to_string(), InstructorProfile::unrated("TBD"))]);
        assert_eq!(
            inject(json!([[{"crn": 1}]]), &ratings),
            json!([[{"instructor": {"fullName": "TBD"}, "crn": 1}]])
        );
    }

    #[test]
    fn test_topology_and_fields_preserved() {
        let input = json!({
            "202001": [
                {"instructor": "Jane Doe", "title": "Algorithms", "crn": 11},
                {"instructor": "Jane Doe", "title": "Compilers", "crn": 12},
            ],
            "202002": [],
            "202003": [{"title": "Seminar"}],
        });
        let document = Document::from_value(input).unwrap();
        let enriched = inject_ratings(document, &jane_ratings());

        assert_eq!(enriched.layout, Layout::Keyed);
        let shape: Vec<_> = enriched
            .terms
            .iter()
            .map(|t| (t.key.as_str(), t.courses.len()))
            .collect();
        assert_eq!(shape, vec![("202001", 2), ("202002", 0), ("202003", 1)]);

        let titles: Vec<_> = enriched
            .courses()
            .map(|c| c.fields["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Algorithms", "Compilers", "Seminar"]);
        assert_eq!(enriched.terms[2].courses[0].instructor.full_name(), "TBD");
    }
}
