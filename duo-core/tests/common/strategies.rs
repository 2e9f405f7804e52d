// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies

use proptest::prelude::*;

/// Strategy for generating https origins.
pub fn origin_strategy() -> impl Strategy<Value = String> {
    ("[a-zA-Z]{3,10}", "[a-z]{2,4}", proptest::option::of(1024u16..65535))
        .prop_map(|(host, tld, port)| match port {
            Some(port) => format!("https://{}.{}:{}", host, tld, port),
            None => format!("https://{}.{}", host, tld),
        })
}

/// Strategy for generating public ids.
pub fn public_id_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,12}"
}

/// Strategy for generating navigation sequences (true = forward jump).
pub fn navigation_strategy() -> impl Strategy<Value = Vec<(bool, usize)>> {
    proptest::collection::vec((any::<bool>(), 0usize..40), 0..30)
}
