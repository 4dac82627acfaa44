// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

mod discovery;

#[cfg(target_os = "linux")]
pub mod utils {
    use std::net::Ipv4Addr;
    use std::process::Command;
    use std::thread;
    use std::time::Duration;

    pub const HOST_IP: Ipv4Addr = Ipv4Addr::new(10, 200, 0, 1);
    pub const TARGET_IP: Ipv4Addr = Ipv4Addr::new(10, 200, 0, 2);

    /// A veth pair with one end moved into its own network namespace.
    ///
    /// The host end carries `HOST_IP/24`, the namespaced end `TARGET_IP/24`.
    /// Everything is torn down on drop.
    pub struct NetnsContext {
        pub ns_name: String,
        pub host_if: String,
        pub target_if: String,
    }

    impl NetnsContext {
        /// Returns `None` without root privileges or the `ip` tool.
        pub fn new(suffix: &str) -> Option<Self> {
            let ns_name = format!("lanwake-ns-{}", suffix);
            let host_if = format!("v-host-{}", suffix);
            let target_if = format!("v-targ-{}", suffix);

            Self::cleanup(&ns_name, &host_if);

            if !run_cmd("ip", &["netns", "add", &ns_name]) {
                return None;
            }

            if !run_cmd(
                "ip",
                &[
                    "link", "add", &host_if, "type", "veth", "peer", "name", &target_if,
                ],
            ) {
                Self::cleanup(&ns_name, &host_if);
                return None;
            }

            if !run_cmd("ip", &["link", "set", &target_if, "netns", &ns_name]) {
                Self::cleanup(&ns_name, &host_if);
                return None;
            }

            let host_cidr = format!("{HOST_IP}/24");
            let target_cidr = format!("{TARGET_IP}/24");

            run_cmd("ip", &["addr", "add", &host_cidr, "dev", &host_if]);
            run_cmd("ip", &["link", "set", &host_if, "up"]);

            run_ns_cmd(&ns_name, "ip", &["addr", "add", &target_cidr, "dev", &target_if]);
            run_ns_cmd(&ns_name, "ip", &["link", "set", &target_if, "up"]);
            run_ns_cmd(&ns_name, "ip", &["link", "set", "lo", "up"]);

            thread::sleep(Duration::from_millis(500));

            Some(Self {
                ns_name,
                host_if,
                target_if,
            })
        }

        /// Hardware address of the namespaced end, as the kernel prints it.
        pub fn target_mac(&self) -> Option<String> {
            let path = format!("/sys/class/net/{}/address", self.target_if);
            let output = Command::new("ip")
                .args(["netns", "exec", &self.ns_name, "cat", &path])
                .output()
                .ok()?;
            output
                .status
                .success()
                .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
        }

        fn cleanup(ns_name: &str, host_if: &str) {
            let _ = Command::new("ip").args(["netns", "del", ns_name]).output();
            let _ = Command::new("ip").args(["link", "del", host_if]).output();
        }
    }

    impl Drop for NetnsContext {
        fn drop(&mut self) {
            Self::cleanup(&self.ns_name, &self.host_if);
        }
    }

    fn run_cmd(cmd: &str, args: &[&str]) -> bool {
        let status = Command::new(cmd).args(args).status();
        match status {
            Ok(s) => s.success(),
            Err(_) => false,
        }
    }

    fn run_ns_cmd(ns: &str, cmd: &str, args: &[&str]) -> bool {
        let mut final_args = vec!["netns", "exec", ns, cmd];
        final_args.extend_from_slice(args);
        run_cmd("ip", &final_args)
    }
}
