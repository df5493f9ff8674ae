use studio_core::{AppViewModel, ButtonView, ResultKind};

/// One line per view field, always in the same order.
pub fn describe(view: &AppViewModel) -> Vec<String> {
    let status = match (&view.status_text, view.loading_visible) {
        (Some(text), true) => format!("{text} (working)"),
        (Some(text), false) => text.clone(),
        (None, _) => "-".to_string(),
    };
    let result = match &view.result {
        Some(media) if !view.result_placeholder_visible => {
            let kind = match media.kind {
                ResultKind::Image => "image",
                ResultKind::Video => "video",
            };
            format!("{kind} {}", media.url)
        }
        _ => "(none yet)".to_string(),
    };

    vec![
        format!("status:   {status}"),
        format!("generate: {}", button(&view.generate)),
        format!("download: {}", button(&view.download)),
        format!("preview:  {}", view.preview_url.as_deref().unwrap_or("-")),
        format!("job:      {}", view.job_id.as_deref().unwrap_or("-")),
        format!("result:   {result}"),
        format!(
            "saved:    {}",
            view.last_saved
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "-".to_string())
        ),
    ]
}

/// Lines of `next` that differ from `previous`.
pub fn changes(previous: &AppViewModel, next: &AppViewModel) -> Vec<String> {
    describe(previous)
        .into_iter()
        .zip(describe(next))
        .filter_map(|(old, new)| (old != new).then_some(new))
        .collect()
}

fn button(view: &ButtonView) -> String {
    let state = if view.enabled { "enabled" } else { "disabled" };
    format!("[{}] {state}", view.label)
}

#[cfg(test)]
mod tests {
    use super::{changes, describe};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use studio_core::{update, AppState, Msg, SelectedFile};

    #[test]
    fn idle_view_has_placeholders() {
        let view = AppState::new().view();
        assert_eq!(
            describe(&view),
            vec![
                "status:   -",
                "generate: [Generate] disabled",
                "download: [Download] disabled",
                "preview:  -",
                "job:      -",
                "result:   (none yet)",
                "saved:    -",
            ]
        );
    }

    #[test]
    fn only_changed_lines_are_reported() {
        let before = AppState::new().view();
        let (state, _) = update(
            AppState::new(),
            Msg::FileSelected(SelectedFile::new(PathBuf::from("me.png"), "image/png")),
        );
        let after = state.view();
        assert_eq!(
            changes(&before, &after),
            vec!["status:   UPLOADING... (working)", "generate: [UPLOADING...] disabled"]
        );
        assert!(changes(&after, &after).is_empty());
    }

    #[test]
    fn video_result_is_labelled() {
        let (state, effects) = update(
            AppState::new(),
            Msg::FileSelected(SelectedFile::new(PathBuf::from("me.png"), "image/png")),
        );
        assert_eq!(effects.len(), 1);
        let session = state.session();
        let (state, _) = update(
            state,
            Msg::UploadFinished {
                session,
                result: Ok("https://c/me.png".to_string()),
            },
        );
        let (state, _) = update(state, Msg::GenerateClicked);
        let (state, _) = update(
            state,
            Msg::GenerationFinished {
                session,
                result: Ok("https://c/out.MP4?x=1".to_string()),
            },
        );
        let lines = describe(&state.view());
        assert_eq!(lines[5], "result:   video https://c/out.MP4?x=1");
        assert_eq!(lines[2], "download: [Download] enabled");
    }
}
