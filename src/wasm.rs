#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use leptos::*;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::browser::{BrowserTimer, FetchTransport};
use crate::gameplay::{self, NextOutcome, ResultSummary};
use crate::{GenerationClient, GenerationConfig, Phase, QuizSession, SessionHandle, flow};

type Client = Rc<GenerationClient<FetchTransport, BrowserTimer>>;

#[derive(Clone)]
struct AppContext {
    session: SessionHandle,
    client: Client,
    changed: Trigger,
}

impl AppContext {
    /// Reads the session and subscribes the caller to later changes.
    fn read<R>(&self, f: impl FnOnce(&QuizSession) -> R) -> R {
        self.changed.track();
        self.session.read(f)
    }
}

fn set_body_theme(theme: &str) {
    if let Some(document) = leptos::window().document() {
        if let Some(body) = document.body() {
            let _ = body.set_attribute("data-theme", theme);
        }
    }
}

#[component]
fn TopicSelection() -> impl IntoView {
    let context = expect_context::<AppContext>();
    let (custom_topic, set_custom_topic) = create_signal(String::new());

    let select = Callback::new(move |topic: String| {
        let topic = topic.trim().to_string();
        if topic.is_empty() {
            return;
        }
        context.session.update(|session| {
            if session.phase() == Phase::Menu {
                session.select_topic(topic);
            }
        });
    });

    view! {
        <section class="topic-card">
            <p class="eyebrow">"AI Knowledge Quiz"</p>
            <p class="lede">"Type any topic to generate a unique quiz instantly."</p>
            <div class="topic-input">
                <input
                    type="text"
                    placeholder="e.g., 'Quantum Physics', '90s Pop Music'..."
                    prop:value=custom_topic
                    on:input=move |ev| set_custom_topic.set(event_target_value(&ev))
                    on:keydown=move |event: ev::KeyboardEvent| {
                        if event.key() == "Enter" {
                            select.call(custom_topic.get());
                        }
                    }
                />
                <button
                    class="primary"
                    disabled=move || custom_topic.get().trim().is_empty()
                    on:click=move |_| select.call(custom_topic.get())
                >
                    "Generate Quiz"
                </button>
            </div>
        </section>
    }
}

#[component]
fn LoadingScreen() -> impl IntoView {
    let context = expect_context::<AppContext>();

    if let Some(ticket) = context.session.update(|session| session.begin_loading()) {
        let session = context.session.clone();
        let issued = ticket.clone();
        on_cleanup(move || session.update(|state| state.abandon_loading(&issued)));

        let session = context.session.clone();
        let client = context.client.clone();
        spawn_local(async move {
            flow::load_questions(&session, client.as_ref(), ticket).await;
        });
    }

    let topic = context.session.read(|session| session.topic().to_string());
    let error = {
        let context = context.clone();
        create_memo(move |_| {
            context.read(|session| session.generation_error().map(str::to_string))
        })
    };
    let back = {
        let session = context.session.clone();
        Callback::new(move |_: ()| {
            session.update(|state| {
                if state.phase() == Phase::Loading {
                    state.return_to_menu();
                }
            })
        })
    };

    view! {
        <div class="loading-screen">
            {move || match error.get() {
                Some(message) => view! {
                    <section class="error-card">
                        <p class="eyebrow">"Generation Failed"</p>
                        <p class="error-body">{message}</p>
                        <button class="btn" on:click=move |_| back.call(())>
                            "Try Another Topic"
                        </button>
                    </section>
                }
                .into_view(),
                None => view! {
                    <section class="placeholder-card">
                        <p class="eyebrow">"Curating Questions..."</p>
                        <p class="lede">
                            {format!("AI is researching \"{topic}\" to challenge your knowledge.")}
                        </p>
                        <button class="btn" on:click=move |_| back.call(())>"Cancel"</button>
                    </section>
                }
                .into_view(),
            }}
        </div>
    }
}

#[component]
fn QuizGame() -> impl IntoView {
    let context = expect_context::<AppContext>();
    let snapshot = {
        let context = context.clone();
        create_memo(move |_| context.read(QuizSession::clone))
    };

    let select = {
        let session = context.session.clone();
        Callback::new(move |option: String| {
            session.update(|state| gameplay::select_answer(state, option))
        })
    };
    let next = {
        let session = context.session.clone();
        Callback::new(move |_: ()| {
            if session.update(gameplay::go_next) == NextOutcome::Blocked {
                log::debug!("next ignored: current question unanswered");
            }
        })
    };
    let prev = {
        let session = context.session.clone();
        Callback::new(move |_: ()| session.update(gameplay::go_prev))
    };

    view! {
        <section class="quiz-card">
            <div class="progress-header">
                <span>
                    {move || {
                        snapshot
                            .with(|s| {
                                format!("Question {} of {}", s.current_index() + 1, s.questions().len())
                            })
                    }}
                </span>
                <span class="topic">{move || snapshot.with(|s| s.topic().to_string())}</span>
            </div>
            <div class="progress-track">
                <div
                    class="progress-bar"
                    style=move || format!("width: {}%", snapshot.with(gameplay::progress_percent))
                ></div>
            </div>
            {move || {
                let selected = snapshot.with(|s| s.answer(s.current_index()).map(str::to_string));
                snapshot
                    .with(|s| s.current_question().cloned())
                    .map(|question| {
                        view! {
                            <div class="prompt-area">
                                <p class="prompt">{question.question.clone()}</p>
                            </div>
                            <div class="options-grid">
                                {question
                                    .options
                                    .iter()
                                    .map(|option| {
                                        let is_selected = selected.as_deref() == Some(option.as_str());
                                        let class = if is_selected { "option selected" } else { "option" };
                                        let pressed = is_selected.to_string();
                                        let value = option.clone();
                                        view! {
                                            <button
                                                class=class
                                                aria-pressed=pressed
                                                on:click=move |_| select.call(value.clone())
                                            >
                                                <span class="option-body">{option.clone()}</span>
                                            </button>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        }
                    })
            }}
            <div class="quiz-actions">
                <button
                    class="btn"
                    disabled=move || snapshot.with(|s| s.current_index() == 0)
                    on:click=move |_| prev.call(())
                >
                    "Previous"
                </button>
                <button
                    class="btn btn-primary"
                    disabled=move || !snapshot.with(gameplay::is_answered)
                    on:click=move |_| next.call(())
                >
                    {move || {
                        if snapshot.with(gameplay::is_last_question) { "Finish Quiz" } else { "Next" }
                    }}
                </button>
            </div>
        </section>
    }
}

#[component]
fn ResultScreen() -> impl IntoView {
    let context = expect_context::<AppContext>();

    {
        let session = context.session.clone();
        let client = context.client.clone();
        spawn_local(async move {
            flow::run_feedback(&session, client.as_ref()).await;
        });
    }

    let summary = ResultSummary::from_session(&context.session.snapshot());
    let topic = context.session.read(|session| session.topic().to_string());
    let feedback = {
        let context = context.clone();
        create_memo(move |_| {
            context.read(|session| {
                (
                    session.is_feedback_pending(),
                    session.feedback_text().map(str::to_string),
                )
            })
        })
    };
    let restart = {
        let session = context.session.clone();
        move |_| session.update(|state| state.reset())
    };

    let review = summary
        .review
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let status = if entry.is_correct {
                "review-entry correct"
            } else {
                "review-entry wrong"
            };
            let correction = (!entry.is_correct).then(|| {
                view! {
                    <p class="review-correct">
                        {format!("Correct Answer: {}", entry.correct_answer)}
                    </p>
                }
            });
            let selected = entry.selected.unwrap_or_else(|| "No answer".to_string());

            view! {
                <article class=status>
                    <p class="review-question">
                        <span class="option-index">{format!("Q{}", index + 1)}</span>
                        {entry.question}
                    </p>
                    <p class="review-selected">{format!("You Selected: {selected}")}</p>
                    {correction}
                </article>
            }
        })
        .collect_view();

    view! {
        <section class="result-card">
            <p class="eyebrow">"Quiz Complete!"</p>
            <p class="lede">{format!("Topic: {topic}")}</p>
            <p class="score">
                <span class="score-value">{summary.score}</span>
                <span class="score-total">{format!("/{}", summary.total)}</span>
            </p>
            <p class="accuracy">{format!("{}% Accuracy", summary.percentage)}</p>
        </section>
        <section class="feedback-card">
            <p class="eyebrow">"AI Performance Review"</p>
            {move || {
                let (pending, text) = feedback.get();
                if pending {
                    view! { <p class="status">"Analyzing your answers..."</p> }.into_view()
                } else {
                    let text = text.unwrap_or_else(|| "Detailed feedback will appear here.".to_string());
                    view! { <p class="feedback-body">{text}</p> }.into_view()
                }
            }}
        </section>
        <section class="review-list">{review}</section>
        <div class="result-actions">
            <button class="btn btn-primary" on:click=restart>
                "Start New Quiz"
            </button>
        </div>
    }
}

#[component]
fn App() -> impl IntoView {
    let (theme, set_theme) = create_signal(String::from("light"));
    let changed = create_trigger();

    let session = SessionHandle::new();
    session.on_change(move || changed.notify());
    let client = Rc::new(GenerationClient::new(
        GenerationConfig::from_build_env(),
        FetchTransport,
        BrowserTimer,
    ));
    let context = AppContext {
        session,
        client,
        changed,
    };
    provide_context(context.clone());

    create_effect(move |_| set_body_theme(&theme.get()));

    let toggle_theme = move |_| {
        let next = if theme.get() == "dark" { "light" } else { "dark" };
        set_theme.set(String::from(next));
    };

    let phase = create_memo(move |_| context.read(QuizSession::phase));

    view! {
        <main class="page">
            <header class="page-header">
                <h1 class="headline">"AI Knowledge Quiz"</h1>
                <button class="pill" on:click=toggle_theme>
                    {move || if theme.get() == "dark" { "Switch to light" } else { "Switch to dark" }}
                </button>
            </header>
            {move || match phase.get() {
                Phase::Menu => view! { <TopicSelection /> }.into_view(),
                Phase::Loading => view! { <LoadingScreen /> }.into_view(),
                Phase::Quiz => view! { <QuizGame /> }.into_view(),
                Phase::Result => view! { <ResultScreen /> }.into_view(),
            }}
        </main>
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    mount_to_body(|| view! { <App /> });
}
