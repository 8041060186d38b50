use chrono::NaiveDate;

use super::super::ServiceDependencies;
use super::errors::{LoanApplicationError, Result};
use super::loan_service::get_all_late_loans;

/// 延滞通知バッチ
///
/// 延滞中の貸出の借り手メールアドレスを集め、通知サービスを1回だけ呼び出す。
///
/// ビジネスルール：
/// - 本文は固定（設定値）、宛先は延滞者全員
/// - メールアドレスのない貸出は宛先から外し、警告を記録する
/// - 送信失敗は再送せずそのまま返す
///
/// # 戻り値
/// 宛先に含めたアドレスの件数
pub async fn notify_late_loans(
    deps: &ServiceDependencies,
    message: &str,
    today: NaiveDate,
) -> Result<usize> {
    let late_loans = get_all_late_loans(deps, today).await?;

    let mut recipients = Vec::with_capacity(late_loans.len());
    for loan in late_loans {
        match loan.customer_email {
            Some(email) if !email.trim().is_empty() => recipients.push(email),
            _ => tracing::warn!(
                loan_id = %loan.id,
                customer = %loan.customer,
                "late loan has no customer email; skipping notification"
            ),
        }
    }

    deps.notification_service
        .send(message, &recipients)
        .await
        .map_err(LoanApplicationError::NotificationError)?;

    tracing::info!(recipients = recipients.len(), "late loan notification dispatched");

    Ok(recipients.len())
}
