//! Route table computation.
//!
//! Routes are emitted under the `cf-router` key of the desired LRP's routing
//! info. Either the caller's overrides decide every hostname, or the default
//! policy gives each exposed port `name-PORT.domain` and the monitored port
//! the short `name.domain` as well.

use serde::{Deserialize, Serialize};

use super::app::{AppSpec, RouteOverride};
use super::lrp::Routes;

/// Routing info key understood by the HTTP router.
pub const CF_ROUTER: &str = "cf-router";

/// Hostnames routed to one container port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRoute {
    pub hostnames: Vec<String>,
    pub port: u16,
}

/// Ordered route table for an app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppRoutes(pub Vec<AppRoute>);

impl AppRoutes {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppRoute> {
        self.0.iter()
    }

    /// Hostnames for `port`, if the table routes it.
    #[must_use]
    pub fn hostnames(&self, port: u16) -> Option<&[String]> {
        self.0
            .iter()
            .find(|route| route.port == port)
            .map(|route| route.hostnames.as_slice())
    }

    /// Encode as scheduler routing info.
    ///
    /// An empty table still produces an explicit empty `cf-router` entry so an
    /// update clears existing routes instead of leaving them in place.
    #[must_use]
    pub fn routing_info(&self) -> Routes {
        let mut routes = Routes::new();
        routes.insert(
            CF_ROUTER.to_string(),
            serde_json::to_value(self).unwrap_or(serde_json::Value::Array(Vec::new())),
        );
        routes
    }

    /// Decode the `cf-router` entry of scheduler routing info.
    ///
    /// Missing or foreign entries decode to an empty table.
    #[must_use]
    pub fn from_routing_info(routes: &Routes) -> Self {
        routes
            .get(CF_ROUTER)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }
}

impl IntoIterator for AppRoutes {
    type Item = AppRoute;
    type IntoIter = std::vec::IntoIter<AppRoute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Build the route table for an app about to be created.
#[must_use]
pub fn compute_routes(spec: &AppSpec, system_domain: &str) -> AppRoutes {
    if spec.no_routes {
        AppRoutes::default()
    } else if !spec.route_overrides.is_empty() {
        routes_from_overrides(&spec.route_overrides, system_domain)
    } else {
        default_routes(
            &spec.name,
            &spec.exposed_ports,
            spec.monitor.port,
            system_domain,
        )
    }
}

/// Group overrides by port, ports in first-seen order and hostnames in
/// override order. Duplicates are kept.
#[must_use]
pub fn routes_from_overrides(overrides: &[RouteOverride], system_domain: &str) -> AppRoutes {
    let mut routes: Vec<AppRoute> = Vec::new();

    for route_override in overrides {
        let hostname = format!("{}.{system_domain}", route_override.hostname_prefix);
        match routes.iter_mut().find(|route| route.port == route_override.port) {
            Some(route) => route.hostnames.push(hostname),
            None => routes.push(AppRoute {
                hostnames: vec![hostname],
                port: route_override.port,
            }),
        }
    }

    AppRoutes(routes)
}

/// One route per exposed port; the monitored port also gets the bare app hostname.
#[must_use]
pub fn default_routes(
    app_name: &str,
    exposed_ports: &[u16],
    monitor_port: u16,
    system_domain: &str,
) -> AppRoutes {
    let routes = exposed_ports
        .iter()
        .map(|&port| {
            let mut hostnames = Vec::with_capacity(2);
            if port == monitor_port {
                hostnames.push(format!("{app_name}.{system_domain}"));
            }
            hostnames.push(format!("{app_name}-{port}.{system_domain}"));
            AppRoute { hostnames, port }
        })
        .collect();

    AppRoutes(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::monitor::MonitorConfig;
    use serde_json::json;

    fn spec(ports: Vec<u16>, overrides: Vec<RouteOverride>, no_routes: bool) -> AppSpec {
        AppSpec {
            name: "foo".into(),
            exposed_ports: ports,
            monitor: MonitorConfig::port(8080),
            route_overrides: overrides,
            no_routes,
            ..AppSpec::default()
        }
    }

    #[test]
    fn default_policy_gives_monitor_port_the_short_hostname() {
        let routes = compute_routes(&spec(vec![8080, 9090], vec![], false), "example.com");

        assert_eq!(
            routes,
            AppRoutes(vec![
                AppRoute {
                    hostnames: vec!["foo.example.com".into(), "foo-8080.example.com".into()],
                    port: 8080,
                },
                AppRoute {
                    hostnames: vec!["foo-9090.example.com".into()],
                    port: 9090,
                },
            ])
        );
    }

    #[test]
    fn overrides_group_by_port_in_order() {
        let overrides = vec![
            RouteOverride::new("api", 8080),
            RouteOverride::new("admin", 9090),
            RouteOverride::new("api2", 8080),
        ];

        let routes = compute_routes(&spec(vec![8080, 9090, 7070], overrides, false), "example.com");

        assert_eq!(routes.len(), 2);
        assert_eq!(
            routes.hostnames(8080).unwrap(),
            ["api.example.com", "api2.example.com"]
        );
        assert_eq!(routes.hostnames(9090).unwrap(), ["admin.example.com"]);
        assert!(routes.hostnames(7070).is_none());
        assert_eq!(routes.0[0].port, 8080);
    }

    #[test]
    fn duplicate_overrides_are_kept() {
        let overrides = vec![RouteOverride::new("api", 8080), RouteOverride::new("api", 8080)];

        let routes = routes_from_overrides(&overrides, "example.com");

        assert_eq!(
            routes.hostnames(8080).unwrap(),
            ["api.example.com", "api.example.com"]
        );
    }

    #[test]
    fn no_routes_wins_over_everything() {
        let routes = compute_routes(
            &spec(vec![8080], vec![RouteOverride::new("api", 8080)], true),
            "example.com",
        );

        assert!(routes.is_empty());
    }

    #[test]
    fn routing_info_is_keyed_by_router() {
        let routes = default_routes("foo", &[8080], 8080, "example.com");

        assert_eq!(
            serde_json::to_value(routes.routing_info()).unwrap(),
            json!({
                "cf-router": [
                    {"hostnames": ["foo.example.com", "foo-8080.example.com"], "port": 8080}
                ]
            })
        );
    }

    #[test]
    fn empty_table_still_sends_router_key() {
        let info = AppRoutes::default().routing_info();

        assert_eq!(info.get(CF_ROUTER), Some(&json!([])));
    }

    #[test]
    fn routing_info_decodes_back() {
        let routes = default_routes("foo", &[8080, 9090], 8080, "example.com");

        assert_eq!(AppRoutes::from_routing_info(&routes.routing_info()), routes);
    }
}
