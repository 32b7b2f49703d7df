// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cartkeep_domain::{CartId, CartRecord};

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request cart state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Admit an externally created cart into the store.
    ///
    /// Carts arise from shopping activity outside this system; import
    /// is how the seed loader and fixtures bring them in.
    ImportCart {
        /// The complete cart record to admit.
        cart: CartRecord,
    },
    /// Make an archived cart active again, archiving whatever cart was
    /// previously active for the same `(client, user)` pair.
    RestoreCart {
        /// The cart to restore.
        cart_id: CartId,
    },
}
