use crate::plan::Plan;
use crate::util::format_ms_date;

const HEADER: [&str; 7] = [
    "date", "status", "prompt", "hooks", "script", "caption", "hashtags",
];

/// Flattens the plan collection for the external CSV consumer: fixed
/// column set, hooks joined with `" | "`, every value double-quoted
/// with internal quotes doubled.
pub fn plans_to_csv(plans: &[Plan]) -> String {
    let mut lines = vec![HEADER.join(",")];
    for plan in plans {
        let fields = [
            format_ms_date(plan.created_at),
            plan.status.as_str().to_string(),
            item_text(plan, "prompt"),
            hook_texts(plan).join(" | "),
            item_text(plan, "script"),
            item_text(plan, "caption"),
            item_text(plan, "hashtags"),
        ];
        let row = fields
            .iter()
            .map(|field| escape(field))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }
    lines.join("\n")
}

pub fn export_filename(now_ms: i64) -> String {
    format!("hustlespark_plans_{}.csv", format_ms_date(now_ms))
}

fn item_text(plan: &Plan, key: &str) -> String {
    plan.items
        .iter()
        .find(|item| item.key == key)
        .map(|item| item.text.clone())
        .unwrap_or_default()
}

fn hook_texts(plan: &Plan) -> Vec<String> {
    plan.items
        .iter()
        .filter(|item| item.key.starts_with("hook"))
        .map(|item| item.text.clone())
        .collect()
}

fn escape(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::coerce::PlanCoercer;
    use crate::ports::ids::IdGenerator;

    struct FixedIds;

    impl IdGenerator for FixedIds {
        fn generate(&self) -> String {
            "plan-1".to_string()
        }
    }

    #[test]
    fn rows_flatten_items_and_quote_values() {
        let coercer = PlanCoercer::new(Arc::new(FixedIds));
        let plan = coercer.coerce(&json!({
            "createdAt": 1_714_566_600_000_i64,
            "status": "posted",
            "items": [
                {"key": "prompt", "label": "Prompt", "text": "3 \"BBQ\" tips"},
                {"key": "hook1", "label": "Hook", "text": "Hook one"},
                {"key": "hook2", "label": "Hook", "text": "Hook two"},
                {"key": "script", "label": "Script", "text": "Do the thing."},
                {"key": "caption", "label": "Caption", "text": "Save this!"},
                {"key": "hashtags", "label": "Hashtags", "text": "#bbq #tips"},
            ]
        }));
        let csv = plans_to_csv(&[plan]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("date,status,prompt,hooks,script,caption,hashtags")
        );
        assert_eq!(
            lines.next(),
            Some(
                "\"2024-05-01\",\"posted\",\"3 \"\"BBQ\"\" tips\",\"Hook one | Hook two\",\
                 \"Do the thing.\",\"Save this!\",\"#bbq #tips\""
            )
        );
    }

    #[test]
    fn empty_collection_is_header_only() {
        assert_eq!(
            plans_to_csv(&[]),
            "date,status,prompt,hooks,script,caption,hashtags"
        );
    }

    #[test]
    fn export_filename_is_date_stamped() {
        assert_eq!(
            export_filename(1_714_566_600_000),
            "hustlespark_plans_2024-05-01.csv"
        );
    }
}
