use std::collections::HashSet;

use shared::ApiBase;
use yew::prelude::*;

use super::home::Home;
use super::scan::ScanScreen;
use super::sensors::SensorsScreen;
use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Home,
    Sensors,
    Scan,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Home, Tab::Sensors, Tab::Scan];

    fn title(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Sensors => "Sensors",
            Tab::Scan => "Scan",
        }
    }
}

pub enum Msg {
    Select(Tab),
    ApiChanged(ApiBase),
}

/// The app shell. Screens mount on first visit and stay mounted, so the
/// sensor window survives switching tabs.
pub struct TabApp {
    active: Tab,
    visited: HashSet<Tab>,
    api: ApiBase,
}

impl Component for TabApp {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let api = config::api_base();
        log::info!("API base: {}", api);
        Self {
            active: Tab::Home,
            visited: HashSet::from([Tab::Home]),
            api,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Select(tab) => {
                if self.active == tab {
                    return false;
                }
                self.active = tab;
                self.visited.insert(tab);
                true
            }
            Msg::ApiChanged(api) => {
                self.api = api;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        html! {
            <div class="app">
                <main class="tab-content">
                    { for Tab::ALL.into_iter().filter(|t| self.visited.contains(t)).map(|tab| {
                        html! {
                            <section key={tab.title()} hidden={tab != self.active}>
                                { self.render_screen(ctx, tab) }
                            </section>
                        }
                    })}
                </main>
                <nav class="tab-bar">
                    { for Tab::ALL.into_iter().map(|tab| html! {
                        <button
                            class={classes!("tab", (tab == self.active).then_some("active"))}
                            onclick={link.callback(move |_| Msg::Select(tab))}
                        >
                            { tab.title() }
                        </button>
                    })}
                </nav>
            </div>
        }
    }
}

impl TabApp {
    fn render_screen(&self, ctx: &Context<Self>, tab: Tab) -> Html {
        let api = self.api.clone();
        match tab {
            Tab::Home => html! {
                <Home
                    api={api}
                    on_navigate={ctx.link().callback(Msg::Select)}
                    on_api_change={ctx.link().callback(Msg::ApiChanged)}
                />
            },
            Tab::Sensors => html! { <SensorsScreen api={api} /> },
            Tab::Scan => html! { <ScanScreen api={api} /> },
        }
    }
}
