//! The form data and input fields shared by the create and edit transaction
//! pages.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    account::Account,
    category::Category,
    database_id::{DatabaseId, deserialize_optional_id},
    dependent::Dependent,
    goal::Goal,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    transaction::{TransactionBuilder, TransactionKind, TransactionStatus},
};

use super::Transaction;

/// The form data for creating or editing a transaction.
///
/// The amount is entered as a positive dollar value; the sign the database
/// expects is derived from the kind by [TransactionForm::signed_amount].
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    pub kind: TransactionKind,
    pub amount: f64,
    pub date: Date,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub category_id: Option<DatabaseId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub account_id: Option<DatabaseId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub goal_id: Option<DatabaseId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub dependent_id: Option<DatabaseId>,
}

impl TransactionForm {
    /// The amount with the sign the transaction kind requires: positive for
    /// income, negative for expenses, zero for reminders.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount.abs(),
            TransactionKind::Expense => -self.amount.abs(),
            TransactionKind::Reminder => 0.0,
        }
    }

    /// Build the row values for a new, already-settled transaction.
    pub fn into_builder(self) -> TransactionBuilder {
        TransactionBuilder {
            kind: self.kind,
            amount: self.signed_amount(),
            date: self.date,
            description: self.description,
            category_id: self.category_id,
            account_id: self.account_id,
            goal_id: self.goal_id,
            dependent_id: self.dependent_id,
            status: TransactionStatus::Paid,
            ..TransactionBuilder::default()
        }
    }

    /// Build the row values for an edit of `existing`, keeping the fields the
    /// form does not cover (scheduling, series, status) unchanged.
    pub fn into_builder_for(self, existing: &Transaction) -> TransactionBuilder {
        TransactionBuilder {
            kind: self.kind,
            amount: self.signed_amount(),
            date: self.date,
            description: self.description,
            category_id: self.category_id,
            account_id: self.account_id,
            goal_id: self.goal_id,
            dependent_id: self.dependent_id,
            status: existing.status,
            scheduled: existing.scheduled,
            recurrence: existing.recurrence,
            series: existing.series,
            reference: existing.reference.clone(),
            closed: existing.closed,
        }
    }
}

/// The linked rows a transaction can be assigned to, used to populate the
/// form's drop-downs.
#[derive(Debug, Default)]
pub(crate) struct LinkOptions {
    pub categories: Vec<Category>,
    pub accounts: Vec<Account>,
    pub goals: Vec<Goal>,
    pub dependents: Vec<Dependent>,
}

/// The field values to prefill the form with.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FormValues<'a> {
    pub kind: Option<TransactionKind>,
    pub amount: Option<f64>,
    pub date: Option<Date>,
    pub description: &'a str,
    pub category_id: Option<DatabaseId>,
    pub account_id: Option<DatabaseId>,
    pub goal_id: Option<DatabaseId>,
    pub dependent_id: Option<DatabaseId>,
}

impl<'a> FormValues<'a> {
    pub fn from_transaction(transaction: &'a Transaction) -> Self {
        Self {
            kind: Some(transaction.kind),
            amount: Some(transaction.amount.abs()),
            date: Some(transaction.date),
            description: &transaction.description,
            category_id: transaction.category_id,
            account_id: transaction.account_id,
            goal_id: transaction.goal_id,
            dependent_id: transaction.dependent_id,
        }
    }
}

pub(crate) fn transaction_form_fields(
    values: FormValues,
    max_date: Option<Date>,
    options: &LinkOptions,
) -> Markup {
    let kind = values.kind.unwrap_or(TransactionKind::Expense);

    html! {
        div
        {
            label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

            select id="kind" name="kind" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="expense" selected[kind == TransactionKind::Expense] { "Expense" }
                option value="income" selected[kind == TransactionKind::Income] { "Income" }
                option value="reminder" selected[kind == TransactionKind::Reminder] { "Reminder" }
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    value=[values.amount]
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                id="date"
                type="date"
                name="date"
                value=[values.date]
                max=[max_date]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                id="description"
                type="text"
                name="description"
                placeholder="Description"
                value=(values.description)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        @if !options.categories.is_empty() {
            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                select id="category_id" name="category_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Select a category" }

                    @for category in &options.categories {
                        option
                            value=(category.id)
                            selected[values.category_id == Some(category.id)]
                        {
                            (category.name)
                        }
                    }
                }
            }
        }

        @if !options.accounts.is_empty() {
            div
            {
                label for="account_id" class=(FORM_LABEL_STYLE) { "Account" }

                select id="account_id" name="account_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Select an account" }

                    @for account in &options.accounts {
                        option
                            value=(account.id)
                            selected[values.account_id == Some(account.id)]
                        {
                            (account.name)
                        }
                    }
                }
            }
        }

        @if !options.goals.is_empty() {
            div
            {
                label for="goal_id" class=(FORM_LABEL_STYLE) { "Goal" }

                select id="goal_id" name="goal_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Select a goal" }

                    @for goal in &options.goals {
                        option
                            value=(goal.id)
                            selected[values.goal_id == Some(goal.id)]
                        {
                            (goal.name)
                        }
                    }
                }
            }
        }

        @if !options.dependents.is_empty() {
            div
            {
                label for="dependent_id" class=(FORM_LABEL_STYLE) { "Recorded by" }

                select id="dependent_id" name="dependent_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Select a person" }

                    @for dependent in &options.dependents {
                        option
                            value=(dependent.id)
                            selected[values.dependent_id == Some(dependent.id)]
                        {
                            (dependent.name)
                        }
                    }
                }
            }
        }
    }
}
