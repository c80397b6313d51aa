//! AI assistant boundary
//!
//! Builds the data context and system instruction for the office's
//! financial assistant and degrades gracefully when no backend is
//! configured: every failure path yields a polite Portuguese reply instead
//! of an error, so the chat surface never breaks.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Debtor, DebtorAgreement};
use crate::format::format_currency;

const UNCONFIGURED_REPLY: &str =
    "Desculpe, o assistente de IA não está configurado corretamente (API Key ausente).";
const FAILURE_REPLY: &str = "Ocorreu um erro ao contatar o assistente de IA.";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Assistant backend unavailable: {0}")]
    Backend(String),
}

/// Text-generation backend. The one seam the assistant needs; production
/// wires a real model client here, tests wire a canned stub.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system_instruction: &str,
        prompt: &str,
    ) -> Result<String, AssistantError>;
}

/// Render the current debtors and agreements as the assistant's data
/// context. Deterministic for a given state: entries appear in collection
/// order and amounts use plain currency formatting (never the privacy
/// mask).
pub fn format_context(debtors: &[Debtor], agreements: &[DebtorAgreement]) -> String {
    let mut context = String::from("Dados Atuais do Sistema:\n");

    context.push_str("--- Devedores ---\n");
    if debtors.is_empty() {
        context.push_str("Nenhum devedor cadastrado.\n");
    } else {
        for debtor in debtors {
            context.push_str(&format!(
                "ID: {}, Nome: {}, Email: {}\n",
                debtor.id, debtor.name, debtor.email
            ));
        }
    }

    context.push_str("\n--- Acordos Financeiros ---\n");
    if agreements.is_empty() {
        context.push_str("Nenhum acordo cadastrado.\n");
    } else {
        for agreement in agreements {
            let debtor_name = debtors
                .iter()
                .find(|d| d.id == agreement.debtor_id)
                .map(|d| d.name.as_str())
                .unwrap_or("Desconhecido");
            let num_installments = agreement.installments.len().max(1) as u32;
            let per_installment =
                (agreement.agreement_value / rust_decimal::Decimal::from(num_installments))
                    .round_dp(2);

            context.push_str(&format!(
                "ID do Acordo: {}, Devedor: {}, Valor Total: {}, Status: {}, Saldo Devedor: {}\n",
                agreement.id,
                debtor_name,
                format_currency(agreement.agreement_value, false),
                agreement.status,
                format_currency(agreement.outstanding_balance(), false),
            ));
            context.push_str(&format!(
                "   Parcelas: {}x de {}\n",
                agreement.installments.len(),
                format_currency(per_installment, false),
            ));
        }
    }
    context.push_str("---\n");
    context
}

/// The assistant's standing instructions, dated so relative questions
/// ("o que vence este mês?") resolve correctly.
pub fn system_instruction(today: NaiveDate) -> String {
    format!(
        "Você é um assistente de IA especialista em análise financeira para escritórios de \
         advocacia, operando dentro do sistema JurisFinance. Sua função é ajudar o usuário a \
         entender os dados sobre devedores e acordos financeiros.\n\
         - Use os dados fornecidos para responder. Não invente informações.\n\
         - Seja conciso, direto e profissional.\n\
         - Formate valores monetários em Reais (R$).\n\
         - Responda em Português do Brasil.\n\
         - Hoje é {}.",
        today.format("%d/%m/%Y")
    )
}

/// The assistant surface: context assembly plus graceful degradation.
pub struct Assistant {
    generator: Option<Box<dyn TextGenerator>>,
}

impl Assistant {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// An assistant with no backend; every question gets the
    /// not-configured reply.
    pub fn unconfigured() -> Self {
        Self { generator: None }
    }

    /// Answer a question against the current data. Never fails: backend
    /// errors are logged and reported to the user in-channel.
    pub async fn ask(
        &self,
        question: &str,
        debtors: &[Debtor],
        agreements: &[DebtorAgreement],
        today: NaiveDate,
    ) -> String {
        let Some(generator) = &self.generator else {
            return UNCONFIGURED_REPLY.to_string();
        };

        let context = format_context(debtors, agreements);
        let prompt = format!("{context}\nPergunta do Usuário: {question}");

        match generator
            .generate(&system_instruction(today), &prompt)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "Assistant backend call failed");
                format!("{FAILURE_REPLY} Detalhes: {e}")
            }
        }
    }
}
