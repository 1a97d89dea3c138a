use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::ports::chat::ChatCompletion;
use crate::profile::Profile;

/// Inputs for the daily plan generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub niche: String,
    pub pillars: Vec<String>,
    pub voice: String,
}

impl GenerationRequest {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            niche: profile.niche.clone(),
            pillars: profile.pillars.clone(),
            voice: profile.voice.clone(),
        }
    }
}

/// Inputs for the trend remix variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrendRemixRequest {
    pub niche: String,
    pub voice: String,
    pub pillars: Vec<String>,
    pub trend: String,
}

/// Inputs for the affiliate offer producer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OfferRequest {
    pub title: String,
    pub link: String,
    pub why: String,
    pub cta: String,
    pub niche: String,
    pub pillars: Vec<String>,
}

/// A complete piece of plan content. Every producer returns this shape;
/// callers never see a partial record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedPlan {
    pub prompt: String,
    pub hooks: Vec<String>,
    pub script: String,
    pub cta: Option<String>,
    pub caption: String,
    pub hashtags: Vec<String>,
}

impl GeneratedPlan {
    /// Shapes the content as a raw plan value for the upsert path. Id,
    /// title and timestamp are left to coercion.
    pub fn to_plan_value(&self, source: &str) -> Value {
        let mut items = vec![item_value("prompt", "Prompt", &self.prompt)];
        for (idx, hook) in self.hooks.iter().enumerate() {
            items.push(item_value(&format!("hook{}", idx + 1), "Hook", hook));
        }
        if !self.script.is_empty() {
            items.push(item_value("script", "Script", &self.script));
        }
        if let Some(cta) = self.cta.as_ref() {
            items.push(item_value("cta", "CTA", cta));
        }
        items.push(item_value("caption", "Caption", &self.caption));
        items.push(item_value("hashtags", "Hashtags", &self.hashtags.join(" ")));
        json!({ "source": source, "items": items, "meta": {} })
    }
}

fn item_value(key: &str, label: &str, text: &str) -> Value {
    json!({ "key": key, "label": label, "text": text })
}

/// Deterministic offline producer: same inputs, same output, no I/O.
pub fn local_plan(request: &GenerationRequest) -> GeneratedPlan {
    GeneratedPlan {
        prompt: sample_prompt(&request.niche),
        hooks: sample_hooks(&request.niche),
        script: sample_script(&request.niche, &request.pillars, &request.voice),
        cta: None,
        caption: sample_caption(&request.niche),
        hashtags: sample_hashtags(&request.niche),
    }
}

/// Deterministic remix of an external trend line into the niche.
pub fn remix_local(request: &TrendRemixRequest) -> GeneratedPlan {
    let niche = request.niche.as_str();
    let voice = request.voice.as_str();
    let trend = request.trend.as_str();
    let first_pillar = request
        .pillars
        .first()
        .map(String::as_str)
        .unwrap_or("a quick win");
    let hooks = vec![
        format!("{trend} — but for {niche}"),
        format!("If you do {niche}, try this twist: {trend}"),
        format!("{niche} hack using this trend: {trend}"),
    ];
    let script = format!(
        "Hook: {hook}\n\
         Intro: Here’s how to adapt this trend to {niche}.\n\
         Step 1: Tie it to {first_pillar}.\n\
         Step 2: Show the before vs after.\n\
         Step 3: Add a fast CTA.\n\
         CTA: Follow for daily {niche} boosts. (Voice: {voice})",
        hook = hooks[0],
    );
    let tag = {
        let slug = niche_tag(niche);
        if slug.is_empty() { "niche".to_string() } else { slug }
    };
    GeneratedPlan {
        prompt: format!("Remix: {trend}"),
        hooks,
        script,
        cta: None,
        caption: format!("Remixing a trend for {niche}. Try this and tell me how it goes."),
        hashtags: vec![
            "#trend".to_string(),
            "#remix".to_string(),
            "#tutorial".to_string(),
            "#howto".to_string(),
            "#content".to_string(),
            format!("#{tag}"),
        ],
    }
}

/// Deterministic affiliate pitch: one link, one caption that carries
/// the whole post. Offers have no script; the caption is the content.
pub fn offer_local(request: &OfferRequest) -> GeneratedPlan {
    let niche = request.niche.as_str();
    let tag = {
        let slug = niche_tag(niche);
        if slug.is_empty() { "niche".to_string() } else { slug }
    };
    let hashtags = vec![
        "#affiliate".to_string(),
        "#recommendation".to_string(),
        "#tools".to_string(),
        "#productivity".to_string(),
        format!("#{tag}"),
    ];
    let hooks = vec![
        format!("Stop wasting time — try this for {niche}"),
        format!("{niche}: the tool I wish I had sooner"),
        format!("If you do {niche}, this is a must"),
    ];
    let first_pillar = request
        .pillars
        .first()
        .map(String::as_str)
        .unwrap_or("Quick win");
    let caption = format!(
        "{title}\n\n\
         Why I like it: {why}\n\
         How I use it ({first_pillar}): 1) Start small 2) Apply daily 3) Track results\n\n\
         {cta} {link}\n\n\
         {tags}",
        title = request.title,
        why = request.why,
        cta = request.cta,
        link = request.link,
        tags = hashtags.join(" "),
    );
    GeneratedPlan {
        prompt: format!("Affiliate: {}", request.title),
        hooks,
        script: String::new(),
        cta: None,
        caption,
        hashtags,
    }
}

fn sample_prompt(niche: &str) -> String {
    format!("3 {niche} tips you can use today")
}

fn sample_hooks(niche: &str) -> Vec<String> {
    vec![
        format!("Stop scrolling if you care about {niche} in 2025"),
        format!("The fastest way to level up your {niche} game"),
        format!("{niche} myth that’s costing you time"),
    ]
}

fn sample_script(niche: &str, pillars: &[String], voice: &str) -> String {
    let first_pillar = pillars.first().map(String::as_str).unwrap_or("one simple win");
    format!(
        "Here’s a quick {niche} tip. First, focus on {first_pillar}. \
         Keep it simple, avoid overthinking, and take one action today. \
         If this helped, save for later and share with a friend. (Voice: {voice})."
    )
}

fn sample_caption(niche: &str) -> String {
    format!("Quick {niche} win you can try today. Save this!")
}

fn sample_hashtags(niche: &str) -> Vec<String> {
    let mut hashtags = vec![format!("#{}", niche_tag(niche))];
    hashtags.extend(
        [
            "#hustle",
            "#contentcreator",
            "#learnontiktok",
            "#howto",
            "#sidehustle",
            "#marketing",
            "#tutorial",
            "#tips",
            "#growth",
        ]
        .map(str::to_string),
    );
    hashtags
}

fn niche_tag(niche: &str) -> String {
    niche
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// The natural-language prompt sent to the remote endpoint.
pub fn completion_prompt(request: &GenerationRequest) -> String {
    format!(
        "Create hooks(3), a 45s script (~140 words), CTA, caption, and 10 hashtags \
         for niche \"{}\" with pillars {} and voice {}. \
         Return as JSON with keys: hooks, script, cta, caption, hashtags.",
        request.niche,
        request.pillars.join(", "),
        request.voice
    )
}

/// The generation pipeline. The remote path is optional and allowed to
/// fail at any point; the local templates are the floor every caller
/// can rely on, so `generate` is infallible.
#[derive(Clone)]
pub struct Generator {
    chat: Option<Arc<dyn ChatCompletion>>,
}

impl Generator {
    pub fn new(chat: Option<Arc<dyn ChatCompletion>>) -> Self {
        Self { chat }
    }

    pub fn local_only() -> Self {
        Self { chat: None }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> GeneratedPlan {
        let local = local_plan(request);
        let Some(chat) = self.chat.as_ref() else {
            return local;
        };
        let content = match chat.complete(&completion_prompt(request)).await {
            Ok(content) => content,
            Err(_) => return local,
        };
        let Ok(remote) = serde_json::from_str::<Value>(&content) else {
            return local;
        };
        merge_remote(local, &remote)
    }

    pub fn remix(&self, request: &TrendRemixRequest) -> GeneratedPlan {
        remix_local(request)
    }

    pub fn offer(&self, request: &OfferRequest) -> GeneratedPlan {
        offer_local(request)
    }
}

/// Field-by-field overlay of the remote payload; every missing or
/// mistyped key keeps the local value.
fn merge_remote(local: GeneratedPlan, remote: &Value) -> GeneratedPlan {
    GeneratedPlan {
        prompt: local.prompt,
        hooks: string_list(remote.get("hooks")).unwrap_or(local.hooks),
        script: non_empty_string(remote.get("script")).unwrap_or(local.script),
        cta: non_empty_string(remote.get("cta")).or(local.cta),
        caption: non_empty_string(remote.get("caption")).unwrap_or(local.caption),
        hashtags: string_list(remote.get("hashtags")).unwrap_or(local.hashtags),
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    let list: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    if list.is_empty() { None } else { Some(list) }
}
