use leptos::prelude::*;

use minermon_app::pages::SettingsPage;
use minermon_app::pages::settings::WifiForm;
use minermon_domain::format::{PLACEHOLDER, format_rssi};
use minermon_domain::sensor::{Environment, NewSensor, SensorModel};

use super::{Stored, spawn_action};
use crate::components::{Loading, ToastNotifier};
use crate::{Api, Controller, watch};

type Page = SettingsPage<Api, ToastNotifier>;

const ENVIRONMENTS: [Environment; 2] = [Environment::SalaQuente, Environment::SalaFria];

fn edit(controller: Stored<Page>, f: impl FnOnce(&mut WifiForm)) {
    controller.with_value(|c| c.page().edit(f));
}

/// WiFi form, network scan and the virtual sensor registry.
#[component]
pub fn Settings(controller: Controller<Page>) -> impl IntoView {
    let model = watch(&controller.page().view);
    let controller: Stored<Page> = StoredValue::new_local(controller);

    let field = move |read: fn(&WifiForm) -> String| move || model.with(|v| read(&v.form));

    view! {
        <section class="page page-settings">
            <h2>"Settings"</h2>
            <Show when=move || !model.with(|v| v.loaded)>
                <Loading what="settings"/>
            </Show>

            <div class="card">
                <h3>"WiFi"</h3>
                <label>
                    "SSID"
                    <input
                        type="text"
                        prop:value=field(|f| f.ssid.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            edit(controller, |f| f.ssid = value);
                        }
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        placeholder="Leave empty to keep the current one"
                        prop:value=field(|f| f.password.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            edit(controller, |f| f.password = value);
                        }
                    />
                </label>
                <label class="checkbox">
                    <input
                        type="checkbox"
                        prop:checked=move || model.with(|v| v.form.use_dhcp)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            edit(controller, |f| f.use_dhcp = checked);
                        }
                    />
                    "Use DHCP"
                </label>
                <Show when=move || !model.with(|v| v.form.use_dhcp)>
                    <label>
                        "Static IP"
                        <input
                            type="text"
                            placeholder="192.168.1.50"
                            prop:value=field(|f| f.static_ip.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                edit(controller, |f| f.static_ip = value);
                            }
                        />
                    </label>
                    <label>
                        "Subnet mask"
                        <input
                            type="text"
                            prop:value=field(|f| f.subnet_mask.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                edit(controller, |f| f.subnet_mask = value);
                            }
                        />
                    </label>
                    <label>
                        "Gateway"
                        <input
                            type="text"
                            placeholder="192.168.1.1"
                            prop:value=field(|f| f.gateway.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                edit(controller, |f| f.gateway = value);
                            }
                        />
                    </label>
                </Show>
                <button
                    class="btn btn-primary"
                    disabled=move || model.with(|v| v.saving)
                    on:click=move |_| {
                        spawn_action(controller, |c| async move { c.page().save_wifi().await });
                    }
                >
                    {move || if model.with(|v| v.saving) { "Saving\u{2026}" } else { "Save" }}
                </button>
            </div>

            <Networks controller=controller/>
            <VirtualSensors controller=controller/>
        </section>
    }
}

/// Scan results with a join button per network.
#[component]
fn Networks(controller: Stored<Page>) -> impl IntoView {
    let model = controller.with_value(|c| watch(&c.page().view));
    let password = RwSignal::new(String::new());

    let scan = move |_| spawn_action(controller, |c| async move { c.page().scan().await });
    let join = move |ssid: String| {
        let password = password.get_untracked();
        spawn_action(controller, move |c| async move {
            c.page().connect(&ssid, &password).await;
        });
    };

    view! {
        <div class="card">
            <h3>"Networks"</h3>
            <div class="row">
                <button
                    class="btn btn-secondary"
                    disabled=move || model.with(|v| v.scanning)
                    on:click=scan
                >
                    {move || if model.with(|v| v.scanning) { "Scanning\u{2026}" } else { "Scan" }}
                </button>
                <input
                    type="password"
                    placeholder="Network password"
                    prop:value=password
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
            </div>
            <ul class="network-list">
                {move || {
                    let connecting = model.with(|v| v.connecting);
                    model
                        .with(|v| v.networks.clone())
                        .into_iter()
                        .map(|network| {
                            let ssid = network.ssid.clone();
                            let security = if network.is_open() {
                                "Open".to_string()
                            } else {
                                network.security.clone()
                            };
                            view! {
                                <li class="network">
                                    <span class="network-ssid">{network.ssid.clone()}</span>
                                    <span class="network-signal" title=network.quality().label()>
                                        {signal_bars(network.quality().bars())}
                                        {format_rssi(Some(network.rssi))}
                                    </span>
                                    <span class="network-security">{security}</span>
                                    <button
                                        class="btn btn-link"
                                        disabled=connecting
                                        on:click=move |_| join(ssid.clone())
                                    >
                                        "Connect"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </div>
    }
}

fn signal_bars(lit: u8) -> impl IntoView {
    view! {
        <span class="signal-bars">
            {(1..=4u8).map(|bar| view! { <i class="bar" class:lit=bar <= lit></i> }).collect_view()}
        </span>
    }
}

/// Sensors registered on the device, and a form to add one.
#[component]
fn VirtualSensors(controller: Stored<Page>) -> impl IntoView {
    let model = controller.with_value(|c| watch(&c.page().view));
    let sensor_model = RwSignal::new(SensorModel::Dht22);
    let name = RwSignal::new(String::new());
    let gpio = RwSignal::new(SensorModel::Dht22.allowed_pins().first().copied().unwrap_or(4));
    let environment = RwSignal::new(None::<Environment>);

    let remove = move |id: String| {
        spawn_action(controller, move |c| async move { c.page().remove_sensor(&id).await });
    };
    let add = move |_| {
        let sensor = NewSensor {
            model: sensor_model.get_untracked(),
            name: name.get_untracked().trim().to_string(),
            environment: environment.get_untracked(),
            gpio: gpio.get_untracked(),
            calibration: None,
            relay: None,
            current: None,
        };
        spawn_action(controller, move |c| async move { c.page().add_sensor(sensor).await });
    };

    view! {
        <div class="card">
            <h3>"Virtual sensors"</h3>
            <ul class="sensor-list">
                {move || {
                    let Some(config) = model.with(|v| v.sensors.clone()) else {
                        return view! { <li class="muted">{PLACEHOLDER}</li> }.into_any();
                    };
                    if config.sensors.is_empty() {
                        return view! { <li class="muted">"No sensors configured"</li> }.into_any();
                    }
                    config
                        .sensors
                        .into_iter()
                        .map(|sensor| {
                            let id = sensor.id.clone();
                            view! {
                                <li class="sensor" class:disabled=!sensor.enabled>
                                    <strong>{sensor.sensor.name.clone()}</strong>
                                    <span class="sensor-details">{sensor.details()}</span>
                                    <button
                                        class="btn btn-danger"
                                        on:click=move |_| remove(id.clone())
                                    >
                                        "Remove"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                        .into_any()
                }}
            </ul>

            <div class="add-sensor">
                <select on:change=move |ev| {
                    if let Ok(selected) = event_target_value(&ev).parse::<SensorModel>() {
                        sensor_model.set(selected);
                        if let Some(pin) = selected.allowed_pins().first() {
                            gpio.set(*pin);
                        }
                    }
                }>
                    {SensorModel::ALL
                        .into_iter()
                        .map(|m| view! { <option value=m.as_str()>{m.as_str()}</option> })
                        .collect_view()}
                </select>
                <input
                    type="text"
                    placeholder="Name"
                    prop:value=name
                    on:input=move |ev| name.set(event_target_value(&ev))
                />
                <select on:change=move |ev| {
                    if let Ok(pin) = event_target_value(&ev).parse() {
                        gpio.set(pin);
                    }
                }>
                    {move || {
                        let selected = gpio.get();
                        sensor_model
                            .get()
                            .allowed_pins()
                            .iter()
                            .map(|&pin| {
                                view! {
                                    <option value=pin.to_string() selected={pin == selected}>
                                        {format!("GPIO {pin}")}
                                    </option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
                <select on:change=move |ev| {
                    let index = event_target_value(&ev).parse::<usize>().ok();
                    environment.set(index.and_then(|i| ENVIRONMENTS.get(i).copied()));
                }>
                    <option value="">"No environment"</option>
                    {ENVIRONMENTS
                        .iter()
                        .enumerate()
                        .map(|(i, env)| view! { <option value=i.to_string()>{env.label()}</option> })
                        .collect_view()}
                </select>
                <button class="btn btn-primary" on:click=add>
                    "Add sensor"
                </button>
            </div>
        </div>
    }
}
