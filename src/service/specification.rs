// Copyright (c) 2025 - Cowboy AI, Inc.
//! Specification catalogue commands

use tracing::info;

use super::notifier::{categories, entity_types};
use super::{EquipmentChange, ServiceResult, UnitOfWork, UtilityNetworkService};
use crate::aggregate::specification::handle_add_specification;
use crate::aggregate::{CommandContext, SpecificationsState, SPECIFICATIONS_AGGREGATE_ID};
use crate::domain::Specification;

impl UtilityNetworkService {
    /// Add a specification of any kind to the catalogue
    pub async fn add_specification(&self, ctx: &CommandContext, specification: Specification) -> ServiceResult<()> {
        let catalogue = self.load::<SpecificationsState>(SPECIFICATIONS_AGGREGATE_ID).await?;
        let specification_id = specification.id();

        let event = handle_add_specification(&catalogue.state, ctx, specification)?;

        let mut work = UnitOfWork::new();
        work.append(SPECIFICATIONS_AGGREGATE_ID, catalogue.version, event);

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::SPECIFICATION_ADDED)
                .added(entity_types::SPECIFICATION, vec![specification_id]),
        )
        .await?;

        info!(%specification_id, "Specification added");
        Ok(())
    }
}
