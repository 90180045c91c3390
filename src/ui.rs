use iced::widget::{button, column, container, row, scrollable, text, text_input, Space};
use iced::{
    application, time, Background, Border, Color, Element, Length, Shadow, Size, Subscription,
    Task, Theme,
};
use std::time::Duration;

use crate::client::DashClient;
use crate::config::{Config, ToolConfig};
use crate::message::Role;
use crate::panel::ChatPanel;

#[derive(Clone, Debug)]
pub struct UiLaunchConfig {
    pub daemon_url: String,
    pub token: String,
    pub config: Config,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Dashboard,
    Tool(usize),
}

struct ToolPane {
    tool: ToolConfig,
    panel: ChatPanel,
    composer: String,
}

struct DeckApp {
    client: DashClient,
    panes: Vec<ToolPane>,
    active_tab: Tab,
    error: String,
    daemon_running: bool,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    HealthChecked(bool),
    TabSelected(Tab),
    ComposerChanged(String),
    SendPressed,
    ResponseReady((usize, String, Result<String, String>)),
}

pub fn launch_ui(launch: UiLaunchConfig) -> iced::Result {
    let boot = launch.clone();
    application(
        move || {
            let state = DeckApp::new(boot.clone());
            let client = state.client.clone();
            let probe = Task::perform(
                async move { client.health().await },
                Message::HealthChecked,
            );
            (state, probe)
        },
        update,
        view,
    )
    .title(app_title)
    .theme(app_theme)
    .window(iced::window::Settings {
        size: Size::new(1180.0, 800.0),
        min_size: Some(Size::new(900.0, 640.0)),
        ..Default::default()
    })
    .subscription(subscription)
    .run()
}

fn app_title(_state: &DeckApp) -> String {
    "PromptDeck".to_string()
}

fn app_theme(_state: &DeckApp) -> Theme {
    Theme::Dark
}

fn subscription(_state: &DeckApp) -> Subscription<Message> {
    time::every(Duration::from_secs(2)).map(|_| Message::Tick)
}

impl DeckApp {
    fn new(launch: UiLaunchConfig) -> Self {
        let panes = launch
            .config
            .tools
            .iter()
            .map(|tool| ToolPane {
                tool: tool.clone(),
                panel: ChatPanel::new(),
                composer: String::new(),
            })
            .collect();

        Self {
            client: DashClient::new(&launch.daemon_url, &launch.token).expect("request client"),
            panes,
            active_tab: Tab::Dashboard,
            error: String::new(),
            daemon_running: false,
        }
    }
}

fn update(state: &mut DeckApp, message: Message) -> Task<Message> {
    match message {
        Message::Tick => {
            let client = state.client.clone();
            Task::perform(async move { client.health().await }, Message::HealthChecked)
        }
        Message::HealthChecked(healthy) => {
            state.daemon_running = healthy;
            Task::none()
        }
        Message::TabSelected(tab) => {
            state.active_tab = tab;
            state.error.clear();
            Task::none()
        }
        Message::ComposerChanged(value) => {
            if let Tab::Tool(index) = state.active_tab {
                if let Some(pane) = state.panes.get_mut(index) {
                    pane.composer = value;
                }
            }
            Task::none()
        }
        Message::SendPressed => {
            let Tab::Tool(index) = state.active_tab else {
                return Task::none();
            };
            let Some(pane) = state.panes.get_mut(index) else {
                return Task::none();
            };
            if pane.panel.pending() || pane.composer.trim().is_empty() {
                return Task::none();
            }
            if !state.daemon_running {
                state.error = "Daemon is not healthy. Start promptdeckd first.".to_string();
                return Task::none();
            }

            match pane.panel.begin_submit(&pane.composer) {
                Ok(turns) => {
                    pane.composer.clear();
                    state.error.clear();

                    let prompt = turns
                        .last()
                        .map(|turn| turn.content.clone())
                        .unwrap_or_default();
                    let client = state.client.clone();
                    let tool_id = pane.tool.id.clone();
                    Task::perform(
                        async move {
                            let result = client
                                .send_chat(&tool_id, &turns)
                                .await
                                .map_err(|err| err.to_string());
                            (index, prompt, result)
                        },
                        Message::ResponseReady,
                    )
                }
                Err(err) => {
                    state.error = err.to_string();
                    Task::none()
                }
            }
        }
        Message::ResponseReady((index, prompt, result)) => {
            if let Some(pane) = state.panes.get_mut(index) {
                match result {
                    Ok(reply) => pane.panel.complete(prompt, reply),
                    Err(err) => {
                        pane.panel.fail();
                        state.error = err;
                    }
                }
            }
            Task::none()
        }
    }
}

fn view(state: &DeckApp) -> Element<'_, Message> {
    let mut tabs = row![tab_button("Dashboard", state.active_tab == Tab::Dashboard, Tab::Dashboard)]
        .spacing(8);
    for (index, pane) in state.panes.iter().enumerate() {
        tabs = tabs.push(tab_button(
            &pane.tool.label,
            state.active_tab == Tab::Tool(index),
            Tab::Tool(index),
        ));
    }

    let status = if state.daemon_running {
        "Daemon healthy"
    } else {
        "Daemon not reachable"
    };

    let body = container(match state.active_tab {
        Tab::Dashboard => view_dashboard(state),
        Tab::Tool(index) => view_tool_tab(state, index),
    })
    .width(Length::Fill)
    .height(Length::Fill);

    let content = column![
        row![
            column![
                text("PromptDeck").size(30),
                text("Explore the power of AI").size(14)
            ]
            .spacing(2),
            Space::new().width(Length::Fill),
            text(status).size(14)
        ]
        .spacing(16)
        .width(Length::Fill)
        .align_y(iced::Alignment::Center),
        container(tabs).padding(8).style(glass_panel),
        body
    ]
    .spacing(12)
    .padding(16)
    .height(Length::Fill);

    container(container(content).height(Length::Fill).style(glass_shell))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .into()
}

fn tab_button(label: &str, active: bool, tab: Tab) -> Element<'_, Message> {
    button(text(label.to_string()).size(14))
        .padding([8, 14])
        .style(if active {
            iced::widget::button::primary
        } else {
            iced::widget::button::secondary
        })
        .on_press(Message::TabSelected(tab))
        .into()
}

fn view_dashboard(state: &DeckApp) -> Element<'_, Message> {
    let cards = state
        .panes
        .iter()
        .enumerate()
        .fold(column!().spacing(10).width(Length::Fill), |col, (index, pane)| {
            col.push(
                button(
                    row![
                        text(pane.tool.label.clone()).size(16),
                        Space::new().width(Length::Fill),
                        text("→").size(16)
                    ]
                    .align_y(iced::Alignment::Center),
                )
                .padding(16)
                .width(Length::Fill)
                .style(iced::widget::button::secondary)
                .on_press(Message::TabSelected(Tab::Tool(index))),
            )
        });

    column![
        text("Chat with the smartest AI - Experience the power of AI").size(16),
        container(scrollable(cards).height(Length::Fill).width(Length::Fill))
            .padding(8)
            .style(glass_panel)
            .width(Length::Fill)
            .height(Length::Fill)
    ]
    .spacing(12)
    .height(Length::Fill)
    .into()
}

fn view_tool_tab(state: &DeckApp, index: usize) -> Element<'_, Message> {
    let Some(pane) = state.panes.get(index) else {
        return column![text("Unknown tool")].into();
    };

    // Most recent entry first; the loading and empty indicators sit above
    // the history, where the next entry would appear.
    let mut list = column!().spacing(10).width(Length::Fill);
    if pane.panel.pending() {
        list = list.push(
            container(text("Thinking...").size(14))
                .padding(12)
                .width(Length::Fill)
                .style(glass_panel),
        );
    }
    if pane.panel.is_empty() && !pane.panel.pending() {
        list = list.push(
            container(text("No conversation started.").size(14))
                .padding(12)
                .width(Length::Fill),
        );
    }
    for message in pane.panel.newest_first() {
        let who = match message.role {
            Role::User => "You",
            Role::Assistant => "Assistant",
        };
        list = list.push(
            container(
                column![
                    text(who.to_string()).size(12),
                    text(message.content.clone()).size(15)
                ]
                .spacing(6),
            )
            .padding(12)
            .width(Length::Fill)
            .style(match message.role {
                Role::User => glass_user_bubble,
                Role::Assistant => glass_bot_bubble,
            }),
        );
    }

    let pending = pane.panel.pending();
    let mut input = text_input("Type a message", &pane.composer)
        .padding(12)
        .width(Length::Fill);
    if !pending {
        input = input
            .on_input(Message::ComposerChanged)
            .on_submit(Message::SendPressed);
    }

    let composer = row![
        input,
        button(if pending { "Sending..." } else { "Generate" })
            .padding([10, 16])
            .style(iced::widget::button::primary)
            .on_press_maybe((!pending).then_some(Message::SendPressed)),
    ]
    .spacing(10)
    .align_y(iced::Alignment::Center);

    column![
        composer,
        if state.error.is_empty() {
            text("")
        } else {
            text(state.error.clone()).color([0.95, 0.45, 0.45])
        },
        container(
            scrollable(container(list).padding([0, 14]).width(Length::Fill))
                .height(Length::Fill)
                .width(Length::Fill)
        )
        .padding(8)
        .style(glass_panel)
        .width(Length::Fill)
        .height(Length::Fill)
    ]
    .spacing(10)
    .height(Length::Fill)
    .into()
}

fn glass_shell(_theme: &Theme) -> iced::widget::container::Style {
    iced::widget::container::Style {
        text_color: None,
        background: Some(Background::Color(Color::from_rgba(0.07, 0.10, 0.18, 0.65))),
        border: Border {
            radius: 18.0.into(),
            width: 1.0,
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.10),
        },
        shadow: Shadow::default(),
        snap: false,
    }
}

fn glass_panel(_theme: &Theme) -> iced::widget::container::Style {
    iced::widget::container::Style {
        text_color: None,
        background: Some(Background::Color(Color::from_rgba(0.10, 0.14, 0.24, 0.58))),
        border: Border {
            radius: 16.0.into(),
            width: 1.0,
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.12),
        },
        shadow: Shadow::default(),
        snap: false,
    }
}

fn glass_user_bubble(_theme: &Theme) -> iced::widget::container::Style {
    iced::widget::container::Style {
        text_color: Some(Color::WHITE),
        background: Some(Background::Color(Color::from_rgba(0.39, 0.40, 0.95, 0.62))),
        border: Border {
            radius: 16.0.into(),
            width: 1.0,
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.14),
        },
        shadow: Shadow::default(),
        snap: false,
    }
}

fn glass_bot_bubble(_theme: &Theme) -> iced::widget::container::Style {
    iced::widget::container::Style {
        text_color: Some(Color::WHITE),
        background: Some(Background::Color(Color::from_rgba(0.49, 0.23, 0.92, 0.55))),
        border: Border {
            radius: 16.0.into(),
            width: 1.0,
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.14),
        },
        shadow: Shadow::default(),
        snap: false,
    }
}
