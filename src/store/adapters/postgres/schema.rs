//! Diesel schema for farm persistence.

diesel::table! {
    /// Aquarium records with derived occupancy.
    aquariums (id) {
        /// Aquarium identifier.
        id -> Uuid,
        /// Owning farm.
        farm_id -> Uuid,
        /// Display number.
        #[max_length = 64]
        number -> Varchar,
        /// Room name.
        #[max_length = 128]
        room -> Varchar,
        /// Water volume in litres.
        volume_litres -> Int4,
        /// Aquarium status.
        #[max_length = 32]
        status -> Varchar,
        /// Derived fish count.
        total_fish -> Int4,
        /// Optimistic-concurrency revision.
        revision -> Int8,
    }
}

diesel::table! {
    /// Locally-owned catalog lots.
    catalog_lots (id) {
        /// Lot identifier.
        id -> Uuid,
        /// Owning farm.
        farm_id -> Uuid,
        /// Common fish name.
        name -> Text,
        /// Scientific name.
        scientific_name -> Nullable<Text>,
        /// Size class.
        size -> Nullable<Text>,
        /// Fish count.
        quantity -> Int4,
        /// Assigned aquarium.
        aquarium_id -> Nullable<Uuid>,
        /// Optimistic-concurrency revision.
        revision -> Int8,
    }
}

diesel::table! {
    /// Fish admitted from external shipments.
    reception_instances (id) {
        /// Instance identifier.
        id -> Uuid,
        /// Reception the instance was admitted with.
        reception_id -> Uuid,
        /// Owning farm.
        farm_id -> Uuid,
        /// Common fish name.
        name -> Text,
        /// Scientific name.
        scientific_name -> Nullable<Text>,
        /// Size class.
        size -> Nullable<Text>,
        /// Fish count.
        current_quantity -> Int4,
        /// Assigned aquarium.
        aquarium_id -> Nullable<Uuid>,
        /// Optimistic-concurrency revision.
        revision -> Int8,
    }
}

diesel::table! {
    /// Transfer plans with aggregate task counters.
    transfer_plans (id) {
        /// Plan identifier.
        id -> Uuid,
        /// Owning farm.
        farm_id -> Uuid,
        /// Plan name.
        name -> Text,
        /// Plan status.
        #[max_length = 32]
        status -> Varchar,
        /// Tasks ever added.
        task_count -> Int4,
        /// Executed tasks.
        completed_task_count -> Int4,
        /// Currently blocked tasks.
        blocked_task_count -> Int4,
        /// Cancelled tasks.
        cancelled_task_count -> Int4,
        /// Author.
        created_by -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Optimistic-concurrency revision.
        revision -> Int8,
    }
}

diesel::table! {
    /// Relocation tasks belonging to transfer plans.
    transfer_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning plan.
        plan_id -> Uuid,
        /// Relocation payload.
        payload -> Jsonb,
        /// Advisory order within the plan.
        task_order -> Int4,
        /// Task status.
        #[max_length = 32]
        status -> Varchar,
        /// Block reason while blocked.
        #[max_length = 32]
        block_reason -> Nullable<Varchar>,
        /// Block notes while blocked.
        block_notes -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Execution timestamp.
        executed_at -> Nullable<Timestamptz>,
        /// Optimistic-concurrency revision.
        revision -> Int8,
    }
}

diesel::table! {
    /// Free-form checklist tasks.
    checklist_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning farm.
        farm_id -> Uuid,
        /// Task title.
        title -> Text,
        /// Task notes.
        notes -> Nullable<Text>,
        /// Task status.
        #[max_length = 32]
        status -> Varchar,
        /// Block reason while blocked.
        #[max_length = 32]
        block_reason -> Nullable<Varchar>,
        /// Block notes while blocked.
        block_notes -> Nullable<Text>,
        /// Embedded relocation payload.
        transfer -> Nullable<Jsonb>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Optimistic-concurrency revision.
        revision -> Int8,
    }
}

diesel::joinable!(transfer_tasks -> transfer_plans (plan_id));

diesel::allow_tables_to_appear_in_same_query!(
    aquariums,
    catalog_lots,
    reception_instances,
    transfer_plans,
    transfer_tasks,
    checklist_tasks,
);
